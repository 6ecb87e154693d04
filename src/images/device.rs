// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//!Bound device: a GPU context together with its capabilities.
//!
//! Every texture created on a device holds an `Rc` to it.  The context is ambient
//! state shared by all of them, so each texture rebinds itself before use.
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::images::capabilities::Capabilities;
use crate::imp::GpuContext;

#[derive(Debug)]
pub struct BoundDevice<C> {
    context: RefCell<C>,
    capabilities: Capabilities,
}

impl<C: GpuContext> BoundDevice<C> {
    /// Binds `context`, detecting its capabilities once.
    pub fn bind(context: C) -> Rc<Self> {
        let capabilities = Capabilities::detect(&context);
        Rc::new(BoundDevice {
            context: RefCell::new(context),
            capabilities,
        })
    }

    /// Binds `context` with explicitly chosen capabilities, e.g. to force the
    /// power-of-two path on a context that supports NPOT.
    pub fn bind_with_capabilities(context: C, capabilities: Capabilities) -> Rc<Self> {
        logwise::info_sync!(
            "Binding device with forced capabilities {caps}",
            caps = logwise::privacy::LogIt(&capabilities)
        );
        Rc::new(BoundDevice {
            context: RefCell::new(context),
            capabilities,
        })
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Shared access to the context.
    ///
    /// # Panics
    /// If the context is mutably borrowed.
    pub fn context(&self) -> Ref<'_, C> {
        self.context.borrow()
    }

    /// Exclusive access to the context.
    ///
    /// # Panics
    /// If the context is already borrowed.
    pub fn context_mut(&self) -> RefMut<'_, C> {
        self.context.borrow_mut()
    }

    /// Like [Self::context_mut], but `None` instead of panicking.
    pub(crate) fn try_context_mut(&self) -> Option<RefMut<'_, C>> {
        self.context.try_borrow_mut().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imp::SoftwareContext;

    #[test]
    fn detects_once_at_bind() {
        let device = BoundDevice::bind(
            SoftwareContext::new("GL_OES_texture_npot").with_max_texture_size(1024),
        );
        assert!(device.capabilities().npot_supported);
        assert_eq!(device.capabilities().max_texture_size, 1024);
    }

    #[test]
    fn forced_capabilities_win() {
        let device = BoundDevice::bind_with_capabilities(
            SoftwareContext::new("GL_OES_texture_npot"),
            Capabilities::default(),
        );
        assert!(!device.capabilities().npot_supported);
        assert_eq!(device.context().extensions(), "GL_OES_texture_npot");
    }
}
