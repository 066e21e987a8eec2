use super::helpers;
use crate::constants::BLOOM_DOWNSCALE;
use wgpu;

pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub(crate) const LDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Scene and bloom format for this adapter: half-float when it can be
/// rendered to, blended and filtered (WebGPU, WebGL2 with float color
/// buffers), else 8-bit.
pub(crate) fn scene_format(adapter: &wgpu::Adapter) -> wgpu::TextureFormat {
    let features = adapter.get_texture_format_features(HDR_FORMAT);
    let usable = features.allowed_usages.contains(
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    ) && features.flags.contains(
        wgpu::TextureFormatFeatureFlags::FILTERABLE | wgpu::TextureFormatFeatureFlags::BLENDABLE,
    );
    if usable {
        HDR_FORMAT
    } else {
        LDR_FORMAT
    }
}

/// `wanted` if the adapter can multisample `format` at that count, else 1.
pub(crate) fn sample_count(adapter: &wgpu::Adapter, format: wgpu::TextureFormat, wanted: u32) -> u32 {
    if wanted > 1
        && adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(wanted)
    {
        wanted
    } else {
        1
    }
}

/// Offscreen color targets for the render pipeline.
///
/// - `hdr_*` hold the resolved scene color for post-processing.
/// - `msaa_*` exist only when antialiasing is on; the scene pass renders there
///   and resolves into `hdr_view`.
/// - `bloom_*` are downscaled ping-pong buffers for bright-pass and blur.
pub(crate) struct RenderTargets {
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
    pub(crate) bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
    pub(crate) format: wgpu::TextureFormat,
    pub(crate) sample_count: u32,
}

#[inline]
pub(crate) fn bloom_size(width: u32, height: u32) -> (u32, u32) {
    (
        (width.max(1) / BLOOM_DOWNSCALE).max(1),
        (height.max(1) / BLOOM_DOWNSCALE).max(1),
    )
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let attach = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (hdr_tex, hdr_view) =
            helpers::create_color_texture(device, "hdr_tex", width, height, format, 1, attach);
        let msaa = (sample_count > 1).then(|| {
            helpers::create_color_texture(
                device,
                "msaa_tex",
                width,
                height,
                format,
                sample_count,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
        });
        let (bw, bh) = bloom_size(width, height);
        let (bloom_a, bloom_a_view) =
            helpers::create_color_texture(device, "bloom_a", bw, bh, format, 1, attach);
        let (bloom_b, bloom_b_view) =
            helpers::create_color_texture(device, "bloom_b", bw, bh, format, 1, attach);
        Self {
            hdr_tex,
            hdr_view,
            msaa,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
            format,
            sample_count,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.destroy();
        *self = Self::new(device, width, height, self.format, self.sample_count);
    }

    /// Attachment the scene pass draws into, and its resolve target if any.
    pub(crate) fn scene_attachment(&self) -> (&wgpu::TextureView, Option<&wgpu::TextureView>) {
        match &self.msaa {
            Some((_, msaa_view)) => (msaa_view, Some(&self.hdr_view)),
            None => (&self.hdr_view, None),
        }
    }

    pub(crate) fn destroy(&self) {
        self.hdr_tex.destroy();
        if let Some((tex, _)) = &self.msaa {
            tex.destroy();
        }
        self.bloom_a.destroy();
        self.bloom_b.destroy();
    }
}
