// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use cliclack::{Theme, ThemeState};
use console::Style;

/// Prompt theme of the property store console.
pub struct ReplTheme;

impl Theme for ReplTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Error(_) => Style::new().red(),
            _ => Style::new().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().yellow(),
            ThemeState::Submit => Style::new().green().dim(),
            ThemeState::Cancel | ThemeState::Error(_) => Style::new().red(),
        }
    }

    fn info_symbol(&self) -> String {
        "●".into()
    }
}
