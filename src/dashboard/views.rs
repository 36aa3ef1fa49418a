//! Server-rendered HTML pages.

use super::stats::DashboardStats;
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;background:#2c2f33;color:#fff;margin:0;padding:2rem}\
.card{background:#23272a;border-radius:8px;padding:1.5rem;margin:0 auto 1rem;max-width:720px}\
.error{color:#f04747}input{display:block;margin:.5rem 0;padding:.5rem;width:100%}\
table{width:100%;border-collapse:collapse}td,th{padding:.4rem;text-align:left}a{color:#7289da}";

/// Escapes text for use in HTML content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{STYLE}</style></head><body>{body}</body></html>"
    )
}

/// Login form, optionally with an error message.
#[must_use]
pub fn login_page(error: Option<&str>) -> String {
    let error = error.map_or_else(String::new, |e| {
        format!("<p class=\"error\">{}</p>", escape(e))
    });
    page(
        "Login",
        &format!(
            "<div class=\"card\"><h1>Bot Dashboard</h1>{error}\
             <form method=\"post\" action=\"/login\">\
             <input name=\"username\" placeholder=\"Username\" required>\
             <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\
             <button type=\"submit\">Log in</button></form></div>"
        ),
    )
}

/// Statistics page.
#[must_use]
pub fn dashboard_page(stats: &DashboardStats) -> String {
    let mut rows = String::new();
    for server in &stats.servers {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&server.name),
            server.member_count,
            escape(&server.id)
        );
    }

    page(
        "Dashboard",
        &format!(
            "<div class=\"card\"><h1>Bot Dashboard</h1><a href=\"/logout\">Log out</a>\
             <p>Servers: <b>{}</b></p><p>Users: <b>{}</b></p>\
             <p>Commands: <b>{}</b></p><p>Uptime: <b>{}</b></p></div>\
             <div class=\"card\"><h2>Servers</h2><table>\
             <tr><th>Name</th><th>Members</th><th>ID</th></tr>{rows}</table></div>",
            stats.server_count,
            stats.user_count,
            stats.command_count,
            escape(&stats.uptime)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::guilds::GuildSummary;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Tom & Jerry's\"</b>"), "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_dashboard_escapes_guild_names() {
        let stats = DashboardStats {
            server_count: 1,
            user_count: 3,
            command_count: 10,
            uptime: "0d 1h 2m".to_string(),
            servers: vec![GuildSummary {
                id: "1".to_string(),
                name: "<script>".to_string(),
                member_count: 3,
            }],
        };
        let html = dashboard_page(&stats);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("0d 1h 2m"));
    }

    #[test]
    fn test_login_error_rendered() {
        assert!(login_page(Some("Invalid username or password")).contains("Invalid username or password"));
        assert!(!login_page(None).contains("class=\"error\""));
    }
}
