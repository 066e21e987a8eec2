use crate::constants::{CANVAS_CLASS, CANVAS_STYLE};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

pub fn find_container(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|_| anyhow::anyhow!("#{} is not an HTML element", id))
}

/// True when the browser exposes `navigator.gpu`.
pub fn has_webgpu(window: &web::Window) -> bool {
    js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("gpu"))
        .map(|gpu| !gpu.is_undefined() && !gpu.is_null())
        .unwrap_or(false)
}

/// True when a throwaway canvas hands out a `webgl2` context.
pub fn has_webgl2(document: &web::Document) -> bool {
    let Ok(el) = document.create_element("canvas") else {
        return false;
    };
    let Ok(canvas) = el.dyn_into::<web::HtmlCanvasElement>() else {
        return false;
    };
    matches!(canvas.get_context("webgl2"), Ok(Some(_)))
}

/// Create a detached canvas styled to fill its container.
pub fn create_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.set_class_name(CANVAS_CLASS);
    canvas
        .set_attribute("style", CANVAS_STYLE)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas
        .set_attribute("aria-hidden", "true")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    Ok(canvas)
}

/// CSS box of the container in CSS pixels.
#[inline]
pub fn container_css_size(container: &web::HtmlElement) -> (f64, f64) {
    (container.client_width() as f64, container.client_height() as f64)
}

pub fn set_canvas_backing_size(canvas: &web::HtmlCanvasElement, width: u32, height: u32) {
    canvas.set_width(width.max(1));
    canvas.set_height(height.max(1));
}

/// High-resolution timestamp in milliseconds, same clock as rAF.
pub fn now_ms(window: &web::Window) -> f64 {
    window
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}
