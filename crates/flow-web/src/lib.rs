#![cfg(target_arch = "wasm32")]
use flow_core::{backing_size, derive_config, Camera, FlowScene, ResizeDebouncer};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod constants;
mod device;
mod dom;
mod frame;
mod observers;
mod perf;
mod render;
mod shaders;

use frame::{FrameContext, RenderLoop};
use observers::Listeners;

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    Ok(())
}

struct Mounted {
    ctx: Rc<RefCell<FrameContext>>,
    render_loop: RenderLoop,
    listeners: Listeners,
}

impl Mounted {
    fn teardown(self) {
        self.render_loop.cancel();
        self.listeners.detach();
        self.ctx.borrow_mut().dispose();
        log::info!("[mount] unmounted");
    }
}

enum MountState {
    Pending,
    Active(Mounted),
    Declined,
    Unmounted,
}

/// Handle returned by [`mount`]. Initialisation finishes asynchronously; until
/// then both `isActive` and `isDeclined` report false.
#[wasm_bindgen]
pub struct FlowLines {
    state: Rc<RefCell<MountState>>,
}

#[wasm_bindgen]
impl FlowLines {
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        match &*self.state.borrow() {
            MountState::Active(m) => {
                m.render_loop.is_scheduled() && m.ctx.borrow().scene.is_running()
            }
            _ => false,
        }
    }

    #[wasm_bindgen(js_name = isDeclined)]
    pub fn is_declined(&self) -> bool {
        matches!(&*self.state.borrow(), MountState::Declined)
    }

    /// Stop rendering and remove everything the mount added. Safe to call
    /// more than once, and before initialisation has finished.
    pub fn unmount(&self) {
        let prev = std::mem::replace(&mut *self.state.borrow_mut(), MountState::Unmounted);
        if let MountState::Active(mounted) = prev {
            mounted.teardown();
        }
    }
}

// Freeing the handle from JS without `unmount` must still detach listeners.
impl Drop for FlowLines {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mount the flow-line field into the element with id `container_id`.
///
/// Never throws. When the environment cannot run the scene the mount is
/// declined, nothing is added to the page and the error goes to the console.
#[wasm_bindgen]
pub fn mount(container_id: &str) -> FlowLines {
    let state = Rc::new(RefCell::new(MountState::Pending));
    let id = container_id.to_string();
    let state_init = state.clone();
    spawn_local(async move {
        let started = Instant::now();
        match init(&id).await {
            Ok(mounted) => {
                let mut state = state_init.borrow_mut();
                if matches!(*state, MountState::Unmounted) {
                    drop(state);
                    mounted.teardown();
                    return;
                }
                perf::log_scene_load(started.elapsed().as_secs_f64() * 1000.0);
                *state = MountState::Active(mounted);
            }
            Err(e) => {
                log::error!("[mount] declined for #{}: {:?}", id, e);
                let mut state = state_init.borrow_mut();
                if matches!(*state, MountState::Pending) {
                    *state = MountState::Declined;
                }
            }
        }
    });
    FlowLines { state }
}

async fn init(container_id: &str) -> anyhow::Result<Mounted> {
    let (window, document) =
        dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;
    let container = dom::find_container(&document, container_id)?;
    if !dom::has_webgpu(&window) && !dom::has_webgl2(&document) {
        anyhow::bail!("neither WebGPU nor WebGL2 is available");
    }

    let device = device::detect(&window);
    let config = derive_config(&device);
    let mut scene = FlowScene::with_entropy(config)?;

    let canvas = dom::create_canvas(&document)?;
    let (css_w, css_h) = dom::container_css_size(&container);
    let (width, height) = backing_size(
        css_w,
        css_h,
        window.device_pixel_ratio(),
        scene.config().max_pixel_ratio,
    );
    dom::set_canvas_backing_size(&canvas, width, height);

    let gpu = render::GpuState::new(&canvas, scene.config()).await?;
    let mut camera = Camera::from_config(scene.config(), 1.0);
    camera.set_viewport(width, height);
    scene.start(dom::now_ms(&window));

    let ctx = Rc::new(RefCell::new(FrameContext {
        scene,
        gpu: Some(gpu),
        camera,
        window: window.clone(),
        canvas: canvas.clone(),
        container: container.clone(),
        resize: ResizeDebouncer::default(),
    }));

    let listeners = match Listeners::attach(&window, &document, &container, &canvas, &ctx) {
        Ok(l) => l,
        Err(e) => {
            ctx.borrow_mut().dispose();
            return Err(e);
        }
    };
    let render_loop = match RenderLoop::start(&window, ctx.clone()) {
        Ok(r) => r,
        Err(e) => {
            listeners.detach();
            ctx.borrow_mut().dispose();
            return Err(e);
        }
    };
    let mounted = Mounted {
        ctx,
        render_loop,
        listeners,
    };

    if let Err(e) = container.append_child(&canvas) {
        mounted.teardown();
        return Err(anyhow::anyhow!(format!("append canvas: {:?}", e)));
    }
    log::info!("[mount] #{} {}x{}", container_id, width, height);
    Ok(mounted)
}
