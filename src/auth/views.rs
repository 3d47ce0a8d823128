use axum::response::Html;

use super::services::LoginPage;

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn login(page: &LoginPage) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Sign in</title></head>
<body>
  <h1>Sign in</h1>
  <a id="google-login" data-client-id="{client_id}" href="{url}">Sign in with Google</a>
</body>
</html>
"#,
        client_id = escape(&page.client_id),
        url = escape(&page.authorization_url),
    ))
}
