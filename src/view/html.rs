//! Server-side page rendering.
//!
//! The page reloads itself every second, matching the poll cadence. Buttons
//! post to the JSON API and reload.

use std::fmt::Write as _;

use crate::view::model::ViewModel;

const SCRIPT: &str = r#"<script>
async function act(path, body) {
  await fetch(path, {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: body ? JSON.stringify(body) : "{}",
  });
  location.reload();
}
</script>"#;

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(model: &ViewModel) -> String {
    let mut body = String::new();

    for n in &model.notifications {
        let _ = write!(
            body,
            r#"<div class="toast"><strong>{}</strong> {} <button onclick="act('/api/notifications/{}/dismiss')">&times;</button></div>"#,
            escape(&n.title),
            escape(&n.description),
            n.id
        );
    }

    match &model.wallet {
        Some(wallet) => {
            let _ = write!(
                body,
                r#"<p>Wallet Public Key: <span id="identity">{}</span></p>"#,
                escape(&wallet.identity)
            );
            let _ = write!(
                body,
                r#"<p>Balance: <span id="balance">{}</span></p>"#,
                escape(&wallet.balance)
            );

            if let Some(airdrop) = &wallet.airdrop {
                let disabled = if airdrop.busy { " disabled" } else { "" };
                let _ = write!(
                    body,
                    r#"<button id="airdrop" onclick="act('/api/airdrop')"{}>{}</button>"#,
                    disabled,
                    escape(&airdrop.label)
                );
            }

            body.push_str(r#"<button onclick="act('/api/wallet/disconnect')">Disconnect</button>"#);
            body.push_str("<h2>Transactions</h2>");

            if let Some(rows) = &wallet.transactions {
                body.push_str(r#"<ul id="transactions">"#);
                for row in rows {
                    let _ = write!(
                        body,
                        r#"<li class="tx">Signature: <code>{}</code></li>"#,
                        escape(&row.signature)
                    );
                }
                body.push_str("</ul>");
            }
        }
        None => {
            let label = if model.connecting { "Connecting..." } else { "Select Wallet" };
            let _ = write!(body, r#"<div id="connect"><p>{}</p>"#, label);
            for option in &model.adapters {
                let _ = write!(
                    body,
                    r#"<button onclick="act('/api/wallet/connect', {{adapter: '{}'}})">{}</button>"#,
                    option.kind,
                    escape(option.label)
                );
            }
            body.push_str("</div>");
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="1">
<title>Solana Dashboard ({cluster})</title>
{script}
</head>
<body>
{body}
</body>
</html>
"#,
        cluster = escape(&model.cluster),
        script = SCRIPT,
        body = body
    )
}
