//! Login form key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::LoginForm;
use crate::effects::UiEffect;

/// Handles a key on the login screen.
///
/// Enter submits from either field. Any non-empty email is accepted; the
/// password is never checked.
pub fn handle_login_key(form: &mut LoginForm, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.focus = form.focus.toggled();
            vec![]
        }
        KeyCode::Enter => submit(form),
        KeyCode::Backspace => {
            form.focused_mut().pop();
            vec![]
        }
        KeyCode::Char('u') if ctrl => {
            form.focused_mut().clear();
            vec![]
        }
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            form.focused_mut().push(c);
            form.error = None;
            vec![]
        }
        _ => vec![],
    }
}

/// Pasted text goes into the focused field, minus line breaks.
pub fn handle_login_paste(form: &mut LoginForm, text: &str) {
    form.focused_mut()
        .extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
}

fn submit(form: &mut LoginForm) -> Vec<UiEffect> {
    let email = form.email.trim();
    if email.is_empty() {
        form.error = Some("Enter an email address".to_string());
        return vec![];
    }
    form.error = None;
    vec![UiEffect::Login {
        email: email.to_string(),
        password: form.password.clone(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LoginField;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut LoginForm, text: &str) {
        for c in text.chars() {
            handle_login_key(form, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut form = LoginForm::default();
        type_text(&mut form, "a@b.com");
        handle_login_key(&mut form, key(KeyCode::Tab));
        type_text(&mut form, "pw");

        assert_eq!(form.email, "a@b.com");
        assert_eq!(form.password, "pw");
        assert_eq!(form.focus, LoginField::Password);
    }

    #[test]
    fn test_enter_submits_trimmed_email() {
        let mut form = LoginForm::default();
        type_text(&mut form, "  a@b.com ");
        handle_login_key(&mut form, key(KeyCode::Tab));
        type_text(&mut form, "secret");

        let effects = handle_login_key(&mut form, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![UiEffect::Login {
                email: "a@b.com".to_string(),
                password: "secret".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_email_is_rejected() {
        let mut form = LoginForm::default();
        let effects = handle_login_key(&mut form, key(KeyCode::Enter));
        assert!(effects.is_empty());
        assert!(form.error.is_some());

        type_text(&mut form, "x");
        assert_eq!(form.error, None);
    }

    #[test]
    fn test_backspace_and_clear() {
        let mut form = LoginForm::default();
        type_text(&mut form, "abc");
        handle_login_key(&mut form, key(KeyCode::Backspace));
        assert_eq!(form.email, "ab");

        handle_login_key(
            &mut form,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert_eq!(form.email, "");
    }

    #[test]
    fn test_esc_quits() {
        let mut form = LoginForm::default();
        assert_eq!(
            handle_login_key(&mut form, key(KeyCode::Esc)),
            vec![UiEffect::Quit]
        );
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut form = LoginForm::default();
        handle_login_paste(&mut form, "a@b.com\n");
        assert_eq!(form.email, "a@b.com");
    }
}
