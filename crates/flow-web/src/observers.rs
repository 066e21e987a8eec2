use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// DOM observers and event listeners feeding a mounted scene. Detached
/// explicitly on unmount; dropping the closures before detaching would leave
/// the browser calling freed callbacks.
pub struct Listeners {
    window: web::Window,
    document: web::Document,
    intersection: web::IntersectionObserver,
    _on_intersect: Closure<dyn FnMut(js_sys::Array)>,
    container_size: web::ResizeObserver,
    _on_container_resize: Closure<dyn FnMut(js_sys::Array)>,
    on_visibility: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut()>,
}

fn remove_listener(target: &web::EventTarget, event: &str, cb: &js_sys::Function) {
    if let Err(e) = target.remove_event_listener_with_callback(event, cb) {
        log::warn!("[mount] removing {} listener: {:?}", event, e);
    }
}

impl Listeners {
    pub fn attach(
        window: &web::Window,
        document: &web::Document,
        container: &web::HtmlElement,
        canvas: &web::HtmlCanvasElement,
        ctx: &Rc<RefCell<FrameContext>>,
    ) -> anyhow::Result<Self> {
        // Off-screen pauses the loop; the last entry wins when several arrive
        let ctx_io = ctx.clone();
        let on_intersect = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            let visible = entries
                .iter()
                .filter_map(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                .last()
                .map(|e| e.is_intersecting());
            if let Some(visible) = visible {
                log::debug!("[mount] intersecting={}", visible);
                ctx_io.borrow_mut().scene.set_intersecting(visible);
            }
        }) as Box<dyn FnMut(js_sys::Array)>);
        let intersection = web::IntersectionObserver::new(on_intersect.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!(format!("IntersectionObserver: {:?}", e)))?;
        intersection.observe(canvas);

        // Container box changes that never touch the window size (layout,
        // sidebars, font loading) go through the same debouncer
        let ctx_box = ctx.clone();
        let on_container_resize = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            let mut ctx = ctx_box.borrow_mut();
            let now = crate::dom::now_ms(&ctx.window);
            ctx.request_resize(now);
        }) as Box<dyn FnMut(js_sys::Array)>);
        let container_size =
            match web::ResizeObserver::new(on_container_resize.as_ref().unchecked_ref()) {
                Ok(o) => o,
                Err(e) => {
                    intersection.disconnect();
                    return Err(anyhow::anyhow!(format!("ResizeObserver: {:?}", e)));
                }
            };
        container_size.observe(container);

        let ctx_vis = ctx.clone();
        let doc_vis = document.clone();
        let on_visibility = Closure::wrap(Box::new(move || {
            let hidden = doc_vis.hidden();
            log::debug!("[mount] page hidden={}", hidden);
            ctx_vis.borrow_mut().scene.set_page_hidden(hidden);
        }) as Box<dyn FnMut()>);
        if let Err(e) = document.add_event_listener_with_callback(
            "visibilitychange",
            on_visibility.as_ref().unchecked_ref(),
        ) {
            intersection.disconnect();
            container_size.disconnect();
            return Err(anyhow::anyhow!(format!("visibilitychange: {:?}", e)));
        }
        ctx.borrow_mut().scene.set_page_hidden(document.hidden());

        let ctx_resize = ctx.clone();
        let on_resize = Closure::wrap(Box::new(move || {
            let mut ctx = ctx_resize.borrow_mut();
            let now = crate::dom::now_ms(&ctx.window);
            ctx.request_resize(now);
        }) as Box<dyn FnMut()>);
        if let Err(e) =
            window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        {
            intersection.disconnect();
            container_size.disconnect();
            remove_listener(
                document,
                "visibilitychange",
                on_visibility.as_ref().unchecked_ref(),
            );
            return Err(anyhow::anyhow!(format!("resize listener: {:?}", e)));
        }

        Ok(Self {
            window: window.clone(),
            document: document.clone(),
            intersection,
            _on_intersect: on_intersect,
            container_size,
            _on_container_resize: on_container_resize,
            on_visibility,
            on_resize,
        })
    }

    pub fn detach(self) {
        self.intersection.disconnect();
        self.container_size.disconnect();
        remove_listener(
            &self.document,
            "visibilitychange",
            self.on_visibility.as_ref().unchecked_ref(),
        );
        remove_listener(
            &self.window,
            "resize",
            self.on_resize.as_ref().unchecked_ref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::testing::{context, sleep_ms, Fixture};
    use crate::frame::RenderLoop;
    use flow_core::backing_size;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test(async)]
    async fn container_resize_reaches_the_canvas() {
        let Fixture {
            window,
            document,
            container,
            canvas,
        } = Fixture::new("flow-lines-resize-container", 320, 200);
        let ctx = context(&window, &container, &canvas);
        let listeners = Listeners::attach(&window, &document, &container, &canvas, &ctx).unwrap();
        let render_loop = RenderLoop::start(&window, ctx.clone()).unwrap();

        // only the container changes; the window keeps its size
        container
            .set_attribute("style", "position:relative;width:480px;height:240px")
            .unwrap();
        sleep_ms(600).await;

        let cfg_ratio = ctx.borrow().scene.config().max_pixel_ratio;
        let (want_w, want_h) = backing_size(480.0, 240.0, window.device_pixel_ratio(), cfg_ratio);
        assert_eq!(canvas.width(), want_w);
        assert_eq!(canvas.height(), want_h);

        render_loop.cancel();
        listeners.detach();
        ctx.borrow_mut().dispose();
        container.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn detached_listeners_ignore_container_resizes() {
        let Fixture {
            window,
            document,
            container,
            canvas,
        } = Fixture::new("flow-lines-detached-container", 320, 200);
        let ctx = context(&window, &container, &canvas);
        let listeners = Listeners::attach(&window, &document, &container, &canvas, &ctx).unwrap();
        let render_loop = RenderLoop::start(&window, ctx.clone()).unwrap();
        sleep_ms(300).await;
        let before = (canvas.width(), canvas.height());

        listeners.detach();
        container
            .set_attribute("style", "position:relative;width:640px;height:360px")
            .unwrap();
        sleep_ms(600).await;

        assert_eq!((canvas.width(), canvas.height()), before);
        assert!(!ctx.borrow().resize.is_pending());

        render_loop.cancel();
        ctx.borrow_mut().dispose();
        container.remove();
    }
}
