use super::splat_map::create_target;

/// A temporary target with the splat map's format and size.
pub(crate) struct ScratchTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Pool of temporary blend targets.
///
/// `acquire` hands out a released target when one exists and allocates
/// otherwise; `release` returns it for the next stamp. Queue ordering keeps a
/// reused target safe: the next copy into it executes after the previous blend
/// pass that read it.
pub(crate) struct ScratchPool {
    size: u32,
    free: Vec<ScratchTarget>,
    allocated: usize,
}

impl ScratchPool {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            free: Vec::new(),
            allocated: 0,
        }
    }

    pub fn acquire(&mut self, device: &wgpu::Device) -> ScratchTarget {
        if let Some(target) = self.free.pop() {
            return target;
        }

        let texture = create_target(device, self.size, "splatmap scratch target");
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.allocated += 1;
        log::debug!("scratch target allocated ({} live)", self.allocated);
        ScratchTarget { texture, view }
    }

    pub fn release(&mut self, target: ScratchTarget) {
        self.free.push(target);
    }

    /// Number of targets allocated over the pool's lifetime and not destroyed.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Destroys every pooled target.
    pub fn destroy(&mut self) {
        for target in self.free.drain(..) {
            target.texture.destroy();
        }
        self.allocated = 0;
    }
}
