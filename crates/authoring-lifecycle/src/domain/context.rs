//! Caller-supplied context for transitions and reads

use std::collections::HashMap;

/// Context map key overriding the version label of the log entry.
pub const CURRENT_REVISION_NAME: &str = "current-revision-name";
/// Context map key flagging the initial phase of an enrollment.
pub const IS_INITIAL_PHASE: &str = "is-initial-phase";

/// Recognized options of a `change_state` request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionContext {
    pub current_revision_name: Option<String>,
    pub is_initial_phase: bool,
}

impl TransitionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_phase() -> Self {
        Self {
            is_initial_phase: true,
            ..Self::default()
        }
    }

    pub fn with_revision_name(mut self, name: impl Into<String>) -> Self {
        self.current_revision_name = Some(name.into());
        self
    }

    /// Build from a raw configuration map; unknown keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        Self {
            current_revision_name: map
                .get(CURRENT_REVISION_NAME)
                .filter(|name| !name.is_empty())
                .cloned(),
            is_initial_phase: map
                .get(IS_INITIAL_PHASE)
                .is_some_and(|flag| flag.eq_ignore_ascii_case("true")),
        }
    }

    /// Log label for simple transitions: the override if set, else the item name.
    pub fn log_label<'a>(&'a self, item_name: &'a str) -> &'a str {
        match self.current_revision_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => item_name,
        }
    }
}

/// Rendering filter requested by the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Live,
    Edit,
}

/// Portlet mode of the rendering container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PortletMode {
    #[default]
    View,
    Edit,
    Help,
}

/// How the content is being viewed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewerContext {
    pub filter_mode: Option<FilterMode>,
    pub portlet_mode: Option<PortletMode>,
}

impl ViewerContext {
    /// Public, live viewing.
    pub fn live() -> Self {
        Self {
            filter_mode: Some(FilterMode::Live),
            portlet_mode: Some(PortletMode::View),
        }
    }

    /// Editor viewing through the filter mode.
    pub fn edit() -> Self {
        Self {
            filter_mode: Some(FilterMode::Edit),
            portlet_mode: None,
        }
    }

    pub fn with_portlet_mode(mut self, mode: PortletMode) -> Self {
        self.portlet_mode = Some(mode);
        self
    }

    /// Either flag requesting edit mode makes the viewer an editor.
    pub fn is_edit(&self) -> bool {
        self.filter_mode == Some(FilterMode::Edit) || self.portlet_mode == Some(PortletMode::Edit)
    }
}
