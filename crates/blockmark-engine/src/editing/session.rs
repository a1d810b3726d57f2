use crate::editing::{
    Action, AssetUploader, EditorState, EventOutcome, InteractionController, KeyPress, LinkPrompt,
    Patch, SelectionSource, ToolbarView, UploadError, UploadFile, UploadLimits,
    derive_toolbar_visibility, submit_image_upload,
};

/// Raw input delivered by the editing surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Key(KeyPress),
    /// The platform selection moved; the session re-reads it from the host
    SelectionChanged,
}

/// Everything a session needs from the surface hosting it
pub trait EditorHost: SelectionSource + LinkPrompt {}

impl<T: SelectionSource + LinkPrompt> EditorHost for T {}

/// One editing surface's ownership of a document's state.
///
/// The surface subscribes the session on mount and unsubscribes it on
/// teardown; events delivered while unmounted are dropped. Sessions never
/// share state with one another.
#[derive(Debug, Clone)]
pub struct EditorSession {
    state: EditorState,
    controller: InteractionController,
    upload_limits: UploadLimits,
    mounted: bool,
}

impl EditorSession {
    pub fn new(
        state: EditorState,
        controller: InteractionController,
        upload_limits: UploadLimits,
    ) -> Self {
        Self {
            state,
            controller,
            upload_limits,
            mounted: false,
        }
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Stop listening. Transient selection and toolbar state is dropped.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        if self.state.selection().is_some() {
            self.state.apply(Action::SetSelection { selection: None });
        }
        if self.state.inline_toolbar().visible {
            self.state.apply(Action::HideInlineToolbar);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn into_state(self) -> EditorState {
        self.state
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Route a raw event through the interaction controller
    pub fn handle(&mut self, event: EditorEvent, host: &mut impl EditorHost) -> EventOutcome {
        if !self.mounted {
            log::debug!("dropping {event:?}: session not mounted");
            return EventOutcome::default();
        }

        match event {
            EditorEvent::Key(key) => self.controller.handle_key(&mut self.state, &key, host),
            EditorEvent::SelectionChanged => EventOutcome {
                shortcut: None,
                patches: self
                    .controller
                    .handle_selection_change(&mut self.state, &*host),
            },
        }
    }

    /// Direct dispatch for toolbar buttons and menus
    pub fn dispatch(&mut self, action: Action) -> Patch {
        self.state.apply(action)
    }

    pub fn upload_image(
        &mut self,
        file: &UploadFile,
        alt_text: &str,
        uploader: &mut impl AssetUploader,
    ) -> Result<Patch, UploadError> {
        submit_image_upload(&mut self.state, file, alt_text, uploader, &self.upload_limits)
    }

    pub fn toolbar(&self) -> ToolbarView {
        derive_toolbar_visibility(&self.state)
    }
}
