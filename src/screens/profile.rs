use crossterm::event::{KeyCode, KeyEvent};

use crate::profiles::{Profiles, AVATARS, MAX_NAME_LEN};

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileAction {
    Select(String),
    Create { name: String, avatar: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormStep {
    Name,
    Avatar,
}

/// New-profile form: a name, then an avatar.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileForm {
    pub step: FormStep,
    pub name: String,
    pub avatar: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileScreen {
    pub selected: usize,
    pub form: Option<ProfileForm>,
    /// Last validation problem, shown under the form
    pub message: Option<String>,
}

impl ProfileScreen {
    pub fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    pub fn start_form(&mut self) {
        self.form = Some(ProfileForm {
            step: FormStep::Name,
            name: String::new(),
            avatar: 0,
        });
        self.message = None;
    }

    pub fn handle_input(&mut self, key: KeyEvent, profiles: &Profiles) -> Option<ProfileAction> {
        if self.form.is_some() {
            return self.handle_form_input(key);
        }
        let count = profiles.all().len();
        match key.code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                return profiles.all().get(self.selected).map(|p| ProfileAction::Select(p.id.clone()));
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.start_form(),
            _ => {}
        }
        None
    }

    fn handle_form_input(&mut self, key: KeyEvent) -> Option<ProfileAction> {
        let form = self.form.as_mut()?;
        match (form.step, key.code) {
            (_, KeyCode::Esc) => {
                self.form = None;
                self.message = None;
            }
            (FormStep::Name, KeyCode::Enter) => {
                if form.name.trim().is_empty() {
                    self.message = Some("Please enter a name".to_string());
                } else {
                    form.step = FormStep::Avatar;
                    self.message = None;
                }
            }
            (FormStep::Name, KeyCode::Backspace) => {
                form.name.pop();
            }
            (FormStep::Name, KeyCode::Char(c)) => {
                if form.name.chars().count() < MAX_NAME_LEN && (c.is_alphanumeric() || c == ' ') {
                    form.name.push(c);
                }
            }
            (FormStep::Avatar, KeyCode::Left) => {
                form.avatar = (form.avatar + AVATARS.len() - 1) % AVATARS.len();
            }
            (FormStep::Avatar, KeyCode::Right) => {
                form.avatar = (form.avatar + 1) % AVATARS.len();
            }
            (FormStep::Avatar, KeyCode::Backspace) => form.step = FormStep::Name,
            (FormStep::Avatar, KeyCode::Enter) => {
                let action = ProfileAction::Create {
                    name: form.name.trim().to_string(),
                    avatar: AVATARS[form.avatar].to_string(),
                };
                self.form = None;
                return Some(action);
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::key;
    use crate::storage::Store;

    fn type_text(screen: &mut ProfileScreen, profiles: &Profiles, text: &str) {
        for c in text.chars() {
            screen.handle_input(key(KeyCode::Char(c)), profiles);
        }
    }

    #[test]
    fn form_collects_name_then_avatar() {
        let profiles = Profiles::default();
        let mut s = ProfileScreen::default();
        s.handle_input(key(KeyCode::Char('n')), &profiles);
        assert!(s.is_editing());

        // Name is required
        s.handle_input(key(KeyCode::Enter), &profiles);
        assert!(s.message.is_some());
        assert_eq!(s.form.as_ref().unwrap().step, FormStep::Name);

        type_text(&mut s, &profiles, "Robin the Brave Reader");
        assert_eq!(s.form.as_ref().unwrap().name.chars().count(), MAX_NAME_LEN);
        s.handle_input(key(KeyCode::Enter), &profiles);
        s.handle_input(key(KeyCode::Left), &profiles);
        let action = s.handle_input(key(KeyCode::Enter), &profiles);
        assert_eq!(
            action,
            Some(ProfileAction::Create {
                name: "Robin the Br".to_string(),
                avatar: AVATARS[AVATARS.len() - 1].to_string(),
            })
        );
        assert!(!s.is_editing());
    }

    #[test]
    fn escape_cancels_the_form() {
        let profiles = Profiles::default();
        let mut s = ProfileScreen::default();
        s.start_form();
        type_text(&mut s, &profiles, "Al");
        assert!(s.handle_input(key(KeyCode::Esc), &profiles).is_none());
        assert!(!s.is_editing());
    }

    #[test]
    fn enter_selects_the_highlighted_profile() {
        let mut store = Store::in_memory();
        let mut profiles = Profiles::load(&store);
        let first = profiles.create(&mut store, "A", AVATARS[0]).unwrap().id.clone();
        let second = profiles.create(&mut store, "B", AVATARS[1]).unwrap().id.clone();

        let mut s = ProfileScreen::default();
        assert_eq!(s.handle_input(key(KeyCode::Enter), &profiles), Some(ProfileAction::Select(first)));
        s.handle_input(key(KeyCode::Down), &profiles);
        s.handle_input(key(KeyCode::Down), &profiles);
        assert_eq!(s.handle_input(key(KeyCode::Enter), &profiles), Some(ProfileAction::Select(second)));
    }
}
