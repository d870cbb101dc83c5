// src/templates/layouts/desktop.rs
use maud::{html, Markup, DOCTYPE};

const STYLE: &str = "
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; color: #222; }
header { display: flex; align-items: center; justify-content: space-between; border-bottom: 1px solid #ddd; margin-bottom: 1.5rem; }
nav ul { display: flex; gap: 1rem; list-style: none; padding: 0; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 6px 8px; text-align: left; }
td.num { text-align: right; }
.card { border: 1px solid #e5e5e5; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
.status-approved { color: #047857; }
.status-rejected { color: #b91c1c; }
.status-pending { color: #92400e; }
";

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="sv" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Klädsystem" }
                style { (STYLE) }
            }
            body {
                header {
                    h3 { "Klädsystem" }
                    nav {
                        ul {
                            li { a href="/" { "Start" } }
                            li { a href="/requisitions" { "Rekvisitioner" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
