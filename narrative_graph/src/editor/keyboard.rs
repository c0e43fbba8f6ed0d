//! Keyboard surface, independent of any binding layer.

/// Logical editor keys. The host maps physical bindings onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKey {
    Delete,
    Backspace,
    Escape,
    SelectAll,
    Duplicate,
    Undo,
    Redo,
    ArrowUp,
    ArrowDown,
    Enter,
}

/// What a key press does in the current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    DeleteSelection,
    /// Clear the selection and cancel any gesture in progress.
    Cancel,
    SelectAll,
    Duplicate,
    Undo,
    Redo,
    MenuUp,
    MenuDown,
    MenuConfirm,
    MenuClose,
}

/// Resolve a key press.
///
/// Nothing is resolved while a text control has focus. While the quick-add
/// menu is open only menu navigation keys apply.
pub fn resolve_key(key: EditorKey, text_input_focused: bool, menu_open: bool) -> Option<KeyCommand> {
    if text_input_focused {
        return None;
    }

    if menu_open {
        return match key {
            EditorKey::ArrowUp => Some(KeyCommand::MenuUp),
            EditorKey::ArrowDown => Some(KeyCommand::MenuDown),
            EditorKey::Enter => Some(KeyCommand::MenuConfirm),
            EditorKey::Escape => Some(KeyCommand::MenuClose),
            _ => None,
        };
    }

    match key {
        EditorKey::Delete | EditorKey::Backspace => Some(KeyCommand::DeleteSelection),
        EditorKey::Escape => Some(KeyCommand::Cancel),
        EditorKey::SelectAll => Some(KeyCommand::SelectAll),
        EditorKey::Duplicate => Some(KeyCommand::Duplicate),
        EditorKey::Undo => Some(KeyCommand::Undo),
        EditorKey::Redo => Some(KeyCommand::Redo),
        EditorKey::ArrowUp | EditorKey::ArrowDown | EditorKey::Enter => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EditorKey::Delete, Some(KeyCommand::DeleteSelection))]
    #[case(EditorKey::Backspace, Some(KeyCommand::DeleteSelection))]
    #[case(EditorKey::Escape, Some(KeyCommand::Cancel))]
    #[case(EditorKey::SelectAll, Some(KeyCommand::SelectAll))]
    #[case(EditorKey::Duplicate, Some(KeyCommand::Duplicate))]
    #[case(EditorKey::Undo, Some(KeyCommand::Undo))]
    #[case(EditorKey::Redo, Some(KeyCommand::Redo))]
    #[case(EditorKey::Enter, None)]
    fn test_canvas_bindings(#[case] key: EditorKey, #[case] expected: Option<KeyCommand>) {
        assert_eq!(resolve_key(key, false, false), expected);
    }

    #[rstest]
    #[case(EditorKey::Delete)]
    #[case(EditorKey::Backspace)]
    #[case(EditorKey::Escape)]
    #[case(EditorKey::SelectAll)]
    #[case(EditorKey::Duplicate)]
    #[case(EditorKey::Undo)]
    #[case(EditorKey::Redo)]
    #[case(EditorKey::Enter)]
    fn test_text_focus_suppresses_everything(#[case] key: EditorKey) {
        assert_eq!(resolve_key(key, true, false), None);
        assert_eq!(resolve_key(key, true, true), None);
    }

    #[rstest]
    #[case(EditorKey::ArrowUp, Some(KeyCommand::MenuUp))]
    #[case(EditorKey::ArrowDown, Some(KeyCommand::MenuDown))]
    #[case(EditorKey::Enter, Some(KeyCommand::MenuConfirm))]
    #[case(EditorKey::Escape, Some(KeyCommand::MenuClose))]
    #[case(EditorKey::Delete, None)]
    #[case(EditorKey::Undo, None)]
    fn test_menu_bindings(#[case] key: EditorKey, #[case] expected: Option<KeyCommand>) {
        assert_eq!(resolve_key(key, false, true), expected);
    }
}
