//! Server-rendered HTML pages.
//!
//! Pages are plain string builders around a shared layout. Every value that
//! came from a player or a session goes through [`escape`].

use heist_common::{DefenseLog, DefenseLogs, DefenseSystem, Notice, PuzzleView, StateSnapshot, Tone};

use crate::game::{Haul, Rules};

const STYLE: &str = r#"
body { background: #0d0d1a; color: #c8f7c5; font-family: monospace; margin: 0; }
nav { background: #1a1a2e; padding: 12px; }
nav a { color: #7fdbff; margin-right: 16px; text-decoration: none; }
main { padding: 24px; max-width: 760px; }
.meter { display: inline-block; width: 18px; height: 12px; margin-right: 2px; background: #333; }
.meter.on { background: #ff4136; }
.notice { padding: 8px 12px; margin: 12px 0; border-left: 4px solid #888; }
.notice.ok { border-color: #2ecc40; }
.notice.bad { border-color: #ff4136; }
.notice.warn { border-color: #ffdc00; }
.detail { color: #ff4136; font-weight: bold; }
.puzzle { border: 1px solid #7fdbff; padding: 12px; margin: 12px 0; }
button { margin-right: 8px; }
table { border-collapse: collapse; }
td, th { border: 1px solid #333; padding: 4px 10px; }
"#;

/// Escape text for HTML element and attribute content
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Data Heist</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
<a href="/">Home</a>
<a href="/training">Training</a>
<a href="/hack">Hack</a>
<a href="/black-market">Black Market</a>
<a href="/system">System</a>
<a href="/login">Defense</a>
</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

fn notice_html(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let class = match notice.tone {
        Tone::Ok => "ok",
        Tone::Bad => "bad",
        Tone::Neutral => "neutral",
        Tone::Warn => "warn",
    };
    let detail = notice
        .detail
        .as_deref()
        .map(|d| format!(r#" <span class="detail">{}</span>"#, escape(d)))
        .unwrap_or_default();

    format!(
        r#"<div class="notice {}">{}{}</div>"#,
        class,
        escape(&notice.text),
        detail
    )
}

fn status_html(state: &StateSnapshot) -> String {
    let meter: String = (0..state.max_detection)
        .map(|i| {
            if i < state.detection {
                r#"<span class="meter on"></span>"#
            } else {
                r#"<span class="meter"></span>"#
            }
        })
        .collect();

    format!(
        r#"<section class="status">
<p>Detection: {meter} {detection}/{max}</p>
<p>Stolen intel: {files} GB | Credits: {credits}</p>
</section>"#,
        detection = state.detection,
        max = state.max_detection,
        files = state.files,
        credits = state.credits,
    )
}

fn logs_table(logs: &DefenseLogs) -> String {
    let rows: String = DefenseSystem::ALL
        .iter()
        .map(|system| {
            let log = logs.get(*system);
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                system.label(),
                log.success,
                log.fail
            )
        })
        .collect();

    format!("<table><tr><th>Defense</th><th>Success</th><th>Fail</th></tr>{rows}</table>")
}

pub fn index_page(state: &StateSnapshot) -> String {
    let body = format!(
        r#"{status}
<p>Break into the defenses, exfiltrate intel, and sell it before the trace closes in.</p>
<p><a href="/hack">Start hacking</a> or <a href="/training">learn the rules first</a>.</p>"#,
        status = status_html(state),
    );
    layout("Data Heist", &body)
}

pub fn training_page() -> String {
    let body = r#"<h2>Wires</h2>
<ul>
<li>2 lights, red and blue wires: <code>connect red blue</code></li>
<li>2 lights, green and yellow wires: <code>cut green</code></li>
<li>3 lights, any wires: <code>disconnect all</code></li>
<li>1 light, red and another wire: cut the other wire, e.g. <code>cut yellow</code></li>
</ul>
<h2>Keypad</h2>
<ul>
<li>Indicator 9: <code>999</code></li>
<li>Even indicator: double it</li>
<li>Odd indicator: add 3</li>
</ul>
<h2>Firewall</h2>
<ul>
<li>Pattern starting with A: reverse it</li>
<li>Pattern starting with B: type it twice</li>
<li>Pattern starting with C: drop the middle letter</li>
<li>Pattern starting with D: type it unchanged</li>
</ul>
<p>Answers are not case sensitive. A wrong answer or a cancelled hack raises detection.</p>"#;
    layout("Training", body)
}

pub fn hack_page(
    state: &StateSnapshot,
    rules: &Rules,
    puzzle: Option<&PuzzleView>,
    notice: Option<&Notice>,
    haul: Option<&Haul>,
) -> String {
    let loot = haul
        .map(|haul| {
            let items: String = haul
                .files
                .iter()
                .map(|f| format!("<li>{} ({} GB)</li>", escape(&f.name), f.size_gb))
                .collect();
            format!(
                "<h3>Exfiltrated</h3><ul>{items}</ul><p>Total: {} GB</p>",
                haul.total_gb
            )
        })
        .unwrap_or_default();

    let controls = match puzzle {
        Some(puzzle) => format!(
            r#"<div class="puzzle">
<p>System: <strong>{system}</strong></p>
<p>{description}</p>
<form method="post" action="/hack">
<input type="text" name="answer" autocomplete="off" autofocus>
<button name="action" value="submit">Submit</button>
<button name="action" value="reroll">Reroll ({reroll_cost} credits)</button>
<button name="action" value="cancel">Cancel</button>
</form>
</div>"#,
            system = puzzle.system.label(),
            description = escape(&puzzle.description),
            reroll_cost = rules.reroll_cost,
        ),
        None => r#"<form method="post" action="/hack">
<button name="action" value="new">New hack</button>
</form>"#
            .to_string(),
    };

    let body = format!(
        r#"{status}
{notice}
{loot}
{controls}
<form method="post" action="/hack">
<button name="action" value="cooldown">Cool down ({cooldown_cost} credits)</button>
</form>"#,
        status = status_html(state),
        notice = notice_html(notice),
        cooldown_cost = rules.cooldown_cost,
    );
    layout("Hack", &body)
}

pub fn login_page(
    state: &StateSnapshot,
    scope: Option<DefenseSystem>,
    stats: Option<DefenseLog>,
    notice: Option<&Notice>,
) -> String {
    let console = match scope {
        None => r#"<form method="post" action="/login">
<select name="defense">
<option value="wires">Wires</option>
<option value="keypad">Keypad</option>
<option value="firewall">Firewall</option>
</select>
<input type="password" name="def_pass" placeholder="Password">
<button name="action" value="choose">Sign in</button>
</form>"#
            .to_string(),
        Some(system) => {
            let stats = stats
                .map(|s| {
                    format!(
                        "<p>{} log: {} successful breaches, {} blocked attempts</p>",
                        system.label(),
                        s.success,
                        s.fail
                    )
                })
                .unwrap_or_default();
            let boost = if state.boost_available {
                r#"<button name="action" value="download">Increase Defense</button>"#
            } else {
                r#"<button name="action" value="download" disabled>Increase Defense (used)</button>"#
            };

            format!(
                r#"<p>Signed in to <strong>{label}</strong>.</p>
{stats}
<form method="post" action="/login">
<button name="action" value="logs">View logs</button>
{boost}
<button name="action" value="cancel_detection">Cancel Detection</button>
<button name="action" value="logout">Sign out</button>
</form>
<p>Boosted hacks remaining: {left}</p>"#,
                label = system.label(),
                left = state.boost_hacks_left,
            )
        }
    };

    let body = format!(
        "{status}\n{notice}\n{console}",
        status = status_html(state),
        notice = notice_html(notice),
    );
    layout("Defense Console", &body)
}

pub fn system_page(state: &StateSnapshot) -> String {
    let boost = if state.boost_hacks_left > 0 {
        format!("<p>Defense boost active: {} hacks left</p>", state.boost_hacks_left)
    } else if state.boost_available {
        "<p>Defense boost ready</p>".to_string()
    } else {
        "<p>Defense boost spent</p>".to_string()
    };

    let body = format!(
        "{status}\n{boost}\n{logs}",
        status = status_html(state),
        logs = logs_table(&state.logs),
    );
    layout("System", &body)
}

pub fn black_market_page(state: &StateSnapshot, gb_per_credit: u64, notice: Option<&Notice>) -> String {
    let body = format!(
        r#"{status}
<p>Rate: {gb_per_credit} GB = 1 credit. Only full groups are bought.</p>
{notice}
<form method="post" action="/black-market">
<input type="number" name="gb" min="1" placeholder="GB to sell">
<button type="submit">Sell</button>
</form>"#,
        status = status_html(state),
        notice = notice_html(notice),
    );
    layout("Black Market", &body)
}
