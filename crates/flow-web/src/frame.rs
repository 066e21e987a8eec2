use crate::dom;
use crate::render::GpuState;
use flow_core::{backing_size, Camera, FlowScene, FrameOutcome, ResizeDebouncer};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub scene: FlowScene,
    pub gpu: Option<GpuState>,
    pub camera: Camera,

    pub window: web::Window,
    pub canvas: web::HtmlCanvasElement,
    pub container: web::HtmlElement,

    pub resize: ResizeDebouncer,
}

impl FrameContext {
    pub fn frame(&mut self, now_ms: f64) {
        if let Some((w, h)) = self.resize.poll(now_ms) {
            self.apply_resize(w, h);
        }
        if let FrameOutcome::Rendered { fps, .. } = self.scene.frame(now_ms) {
            if let Some(fps) = fps {
                log::debug!("[flow] fps={}", fps);
            }
            self.draw();
        }
    }

    fn draw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        gpu.sync_scene(&self.scene);
        match gpu.render(&self.camera) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[gpu] surface lost; reconfiguring");
                gpu.configure_surface();
            }
            Err(e) => log::error!("[gpu] render error: {:?}", e),
        }
    }

    /// Queue a resize to the container's current box; applied once resize
    /// events go quiet.
    pub fn request_resize(&mut self, now_ms: f64) {
        let (css_w, css_h) = dom::container_css_size(&self.container);
        let (w, h) = backing_size(
            css_w,
            css_h,
            self.window.device_pixel_ratio(),
            self.scene.config().max_pixel_ratio,
        );
        self.resize.request(w, h, now_ms);
    }

    fn apply_resize(&mut self, width: u32, height: u32) {
        if self.canvas.width() != width || self.canvas.height() != height {
            dom::set_canvas_backing_size(&self.canvas, width, height);
        }
        self.camera.set_viewport(width, height);
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize_if_needed(width, height);
        }
    }

    /// Dispose the scene, release the GPU and take the canvas out of the page.
    pub fn dispose(&mut self) {
        self.scene.dispose();
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
        self.canvas.remove();
    }
}

/// `requestAnimationFrame` loop over a shared [`FrameContext`].
///
/// The callback keeps a handle to its own slot so it can reschedule itself;
/// [`RenderLoop::cancel`] empties the slot to break that cycle.
pub struct RenderLoop {
    window: web::Window,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl RenderLoop {
    pub fn start(window: &web::Window, ctx: Rc<RefCell<FrameContext>>) -> anyhow::Result<Self> {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let callback_next = callback.clone();
        let handle_next = handle.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            handle_next.set(None);
            let running = {
                let mut ctx = ctx.borrow_mut();
                ctx.frame(now);
                ctx.scene.is_running()
            };
            if !running {
                return;
            }
            if let Some(cb) = callback_next.borrow().as_ref() {
                match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => handle_next.set(Some(id)),
                    Err(e) => log::error!("[flow] requestAnimationFrame: {:?}", e),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let id = {
            let slot = callback.borrow();
            let cb = slot
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("frame callback missing"))?;
            window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .map_err(|e| anyhow::anyhow!(format!("requestAnimationFrame: {:?}", e)))?
        };
        handle.set(Some(id));

        Ok(Self {
            window: window.clone(),
            callback,
            handle,
        })
    }

    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("[flow] cancelAnimationFrame({}): {:?}", id, e);
            }
        }
        self.callback.borrow_mut().take();
    }

    /// A frame is queued with the browser.
    pub fn is_scheduled(&self) -> bool {
        self.handle.get().is_some()
    }

    #[cfg(test)]
    fn has_callback(&self) -> bool {
        self.callback.borrow().is_some()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::FrameContext;
    use crate::dom;
    use flow_core::{backing_size, Camera, FlowScene, ResizeDebouncer, SceneConfig};
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys as web;

    /// A sized container in the page with a scene canvas inside it.
    pub struct Fixture {
        pub window: web::Window,
        pub document: web::Document,
        pub container: web::HtmlElement,
        pub canvas: web::HtmlCanvasElement,
    }

    impl Fixture {
        pub fn new(id: &str, width: u32, height: u32) -> Self {
            let (window, document) = dom::window_document().unwrap();
            let container = document
                .create_element("div")
                .unwrap()
                .dyn_into::<web::HtmlElement>()
                .unwrap();
            container.set_id(id);
            container
                .set_attribute(
                    "style",
                    &format!("position:relative;width:{}px;height:{}px", width, height),
                )
                .unwrap();
            document.body().unwrap().append_child(&container).unwrap();
            let canvas = dom::create_canvas(&document).unwrap();
            container.append_child(&canvas).unwrap();
            Self {
                window,
                document,
                container,
                canvas,
            }
        }
    }

    /// Started scene without a GPU; frames run the simulation and resize
    /// handling only.
    pub fn context(
        window: &web::Window,
        container: &web::HtmlElement,
        canvas: &web::HtmlCanvasElement,
    ) -> Rc<RefCell<FrameContext>> {
        let mut scene = FlowScene::new(SceneConfig::default(), 7).unwrap();
        let (css_w, css_h) = dom::container_css_size(container);
        let (width, height) = backing_size(
            css_w,
            css_h,
            window.device_pixel_ratio(),
            scene.config().max_pixel_ratio,
        );
        dom::set_canvas_backing_size(canvas, width, height);
        let mut camera = Camera::from_config(scene.config(), 1.0);
        camera.set_viewport(width, height);
        scene.start(dom::now_ms(window));
        Rc::new(RefCell::new(FrameContext {
            scene,
            gpu: None,
            camera,
            window: window.clone(),
            canvas: canvas.clone(),
            container: container.clone(),
            resize: ResizeDebouncer::default(),
        }))
    }

    pub async fn sleep_ms(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            web::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    resolve.unchecked_ref(),
                    ms,
                )
                .unwrap();
        });
        JsFuture::from(promise).await.unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{context, sleep_ms, Fixture};
    use super::RenderLoop;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test(async)]
    async fn cancel_clears_handle_and_callback() {
        let fx = Fixture::new("flow-lines-cancel", 160, 90);
        let ctx = context(&fx.window, &fx.container, &fx.canvas);
        let render_loop = RenderLoop::start(&fx.window, ctx.clone()).unwrap();
        assert!(render_loop.is_scheduled());
        assert!(render_loop.has_callback());

        // let a few frames reschedule themselves first
        sleep_ms(100).await;
        assert!(render_loop.is_scheduled());

        render_loop.cancel();
        assert!(!render_loop.is_scheduled());
        assert!(!render_loop.has_callback());

        // nothing fires after cancel
        let frames = ctx.borrow().scene.scheduler().frame_count();
        sleep_ms(100).await;
        assert_eq!(ctx.borrow().scene.scheduler().frame_count(), frames);
        assert!(!render_loop.is_scheduled());

        // a second cancel is a no-op
        render_loop.cancel();
        ctx.borrow_mut().dispose();
        fx.container.remove();
    }

    #[wasm_bindgen_test]
    fn cancel_before_first_frame_clears_everything() {
        let fx = Fixture::new("flow-lines-cancel-early", 160, 90);
        let ctx = context(&fx.window, &fx.container, &fx.canvas);
        let render_loop = RenderLoop::start(&fx.window, ctx.clone()).unwrap();
        render_loop.cancel();
        assert!(!render_loop.is_scheduled());
        assert!(!render_loop.has_callback());
        ctx.borrow_mut().dispose();
        fx.container.remove();
    }
}
