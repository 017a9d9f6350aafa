/// Keys the trap reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusKey {
    Tab,
    ShiftTab,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusAction {
    /// Prevent the default and focus the element at this index.
    MoveTo(usize),
    /// Activate the dialog's dismiss control.
    Dismiss,
    /// Let the browser handle the key.
    Pass,
}

/// Keeps keyboard focus cycling inside a dialog with `len` focusable
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrap {
    len: usize,
}

impl FocusTrap {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `focused` is the index of the currently focused element, if it is
    /// one of the trapped ones.
    pub fn handle(&self, key: FocusKey, focused: Option<usize>) -> FocusAction {
        if key == FocusKey::Escape {
            return FocusAction::Dismiss;
        }
        let Some(last) = self.len.checked_sub(1) else {
            return FocusAction::Pass;
        };
        match (key, focused) {
            (FocusKey::Tab, Some(index)) if index == last => FocusAction::MoveTo(0),
            (FocusKey::ShiftTab, Some(0)) => FocusAction::MoveTo(last),
            _ => FocusAction::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_both_ends() {
        let trap = FocusTrap::new(3);
        assert_eq!(trap.handle(FocusKey::Tab, Some(2)), FocusAction::MoveTo(0));
        assert_eq!(trap.handle(FocusKey::ShiftTab, Some(0)), FocusAction::MoveTo(2));
        assert_eq!(trap.handle(FocusKey::Tab, Some(1)), FocusAction::Pass);
        assert_eq!(trap.handle(FocusKey::ShiftTab, None), FocusAction::Pass);
        assert_eq!(trap.handle(FocusKey::Other, Some(2)), FocusAction::Pass);
    }

    #[test]
    fn escape_dismisses_even_when_empty() {
        let trap = FocusTrap::new(0);
        assert_eq!(trap.handle(FocusKey::Escape, None), FocusAction::Dismiss);
        assert_eq!(trap.handle(FocusKey::Tab, Some(0)), FocusAction::Pass);
    }
}
