use std::borrow::Cow;
use std::time::Duration;

/// When the effects returned from `init` run relative to the first render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitEffects {
    /// Run before anything is rendered or mounted.
    #[default]
    BeforeFirstRender,
    /// Run once the first tree is rendered and mounted.
    AfterFirstRender,
}

/// Configuration for [`Runtime`](crate::runtime::Runtime).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Tag of the synthetic root container wrapping the view.
    ///
    /// It is never compared against user content, so the view may switch
    /// between element and text or change its tag freely.
    pub root_tag: Cow<'static, str>,

    /// Ordering of init effects.
    pub init_effects: InitEffects,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            root_tag: Cow::Borrowed("#root"),
            init_effects: InitEffects::default(),
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root_tag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.root_tag = tag.into();
        self
    }

    #[must_use]
    pub fn init_effects(mut self, order: InitEffects) -> Self {
        self.init_effects = order;
        self
    }
}

/// Redraw pacing for terminal front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Redraws per second.
    pub frame_rate: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { frame_rate: 30 }
    }
}

impl TerminalConfig {
    #[must_use]
    pub const fn new(frame_rate: u32) -> Self {
        Self { frame_rate }
    }

    /// Time between two redraws. A zero frame rate is treated as one.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frame_rate.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.root_tag, "#root");
        assert_eq!(config.init_effects, InitEffects::BeforeFirstRender);
    }

    #[test]
    fn test_builder() {
        let config = RuntimeConfig::new()
            .root_tag("app")
            .init_effects(InitEffects::AfterFirstRender);
        assert_eq!(config.root_tag, "app");
        assert_eq!(config.init_effects, InitEffects::AfterFirstRender);
    }

    #[test]
    fn test_frame_duration() {
        assert_eq!(TerminalConfig::new(10).frame_duration(), Duration::from_millis(100));
        assert_eq!(TerminalConfig::new(0).frame_duration(), Duration::from_secs(1));
        assert_eq!(TerminalConfig::default().frame_rate, 30);
    }
}
