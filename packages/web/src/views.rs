//! HTML for the profile page.

use auth::SessionRecord;

const HOME_HTML: &str = include_str!("../assets/home.html");

/// Anonymous welcome page with the login links.
pub fn welcome() -> &'static str {
    HOME_HTML
}

/// Signed-in view with a logout form.
pub fn profile(record: &SessionRecord) -> String {
    format!(
        r#"<p>You are logged in {}!</p><form action="/logout" method="post"><input type="submit" value="Logout"></form>"#,
        html_escape(&record.display_name)
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
