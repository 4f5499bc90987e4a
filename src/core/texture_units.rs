/// Index of a texture/sampler binding slot
///
/// Under wgpu a unit is a bind-group index; the shader must declare its
/// texture and sampler in the group with the same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextureUnit(pub u32);

impl TextureUnit {
    pub const ZERO: TextureUnit = TextureUnit(0);

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Per-frame table of what is bound to each texture unit
///
/// Plays the role of the active-texture/bind state of immediate-mode graphics
/// APIs: `update_and_bind` fills a slot, the render pass applies the table.
#[derive(Debug, Clone)]
pub struct TextureUnits<B> {
    slots: Vec<Option<B>>,
}

impl<B: Clone> TextureUnits<B> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Bind `binding` to `unit`, replacing whatever was there
    pub fn bind(&mut self, unit: TextureUnit, binding: B) {
        let index = unit.0 as usize;
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(binding);
    }

    /// Binding currently held by `unit`
    pub fn get(&self, unit: TextureUnit) -> Option<&B> {
        self.slots.get(unit.0 as usize).and_then(Option::as_ref)
    }

    pub fn unbind(&mut self, unit: TextureUnit) -> Option<B> {
        self.slots.get_mut(unit.0 as usize).and_then(Option::take)
    }

    /// Occupied units in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (TextureUnit, &B)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|b| (TextureUnit(i as u32), b)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl<B: Clone> Default for TextureUnits<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureUnits<wgpu::BindGroup> {
    /// Attach every bound unit to the render pass as the bind group of the same index
    pub fn apply(&self, pass: &mut wgpu::RenderPass<'_>) {
        for (unit, bind_group) in self.iter() {
            pass.set_bind_group(unit.0, bind_group, &[]);
        }
    }
}
