// src/templates/components/error.rs
use maud::{html, Markup};

use crate::templates::desktop_layout;

/// Full error page for browser routes.
pub fn error_page(status: u16, message: &str) -> Markup {
    desktop_layout(
        &format!("Fel {status}"),
        html! {
            main {
                h1 { "Fel " (status) }
                p { (message) }
                p { a href="/" { "← Till startsidan" } }
            }
        },
    )
}
