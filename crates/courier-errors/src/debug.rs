/// Process-wide debug switch
///
/// Resolved once at startup from configuration and handed to the
/// [`ErrorHandler`](crate::ErrorHandler); nothing reads it from ambient
/// state afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMode(bool);

impl DebugMode {
    pub const OFF: Self = Self(false);
    pub const ON: Self = Self(true);

    pub const fn is_enabled(self) -> bool {
        self.0
    }
}

impl From<bool> for DebugMode {
    fn from(enabled: bool) -> Self {
        Self(enabled)
    }
}
