//! HTML dashboard and markdown summary output.
//!
//! Both renderers are pure functions of [`ReportData`]; writing files and
//! printing is left to the caller.

use std::fmt::{self, Write};

use insights_core::PostRecord;

use crate::aggregate::{DailySummary, ReportData};

const STYLE: &str = r"
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background: #111418; color: #e8e8e8; margin: 0; padding: 24px; }
header { text-align: center; margin-bottom: 24px; }
header h1 { margin: 0; font-size: 26px; }
header p { color: #aaaaaa; margin-top: 4px; }
section { margin: 28px auto; max-width: 1100px; }
h2 { font-size: 19px; border-bottom: 1px solid #2a2f36; padding-bottom: 6px; }
.kpis { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
.kpi { background: rgba(255,255,255,0.04); border: 1px solid rgba(255,255,255,0.1); border-radius: 14px; padding: 22px 12px; text-align: center; }
.kpi .label { color: #cccccc; font-size: 15px; margin-bottom: 6px; }
.kpi .value { font-size: 26px; font-weight: 700; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 6px 8px; border-bottom: 1px solid #2a2f36; text-align: left; vertical-align: middle; }
th.sortable { cursor: pointer; user-select: none; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.bar { display: inline-block; height: 12px; border-radius: 3px; vertical-align: middle; }
.likes { background: #4c8df6; }
.loves { background: #f0506e; }
.impressions { background: deepskyblue; }
.reach { background: orange; }
.clicks { background: #8bc34a; }
.callout { background: rgba(76,141,246,0.12); border-left: 4px solid #4c8df6; padding: 12px 16px; border-radius: 6px; }
.split { display: flex; height: 22px; border-radius: 6px; overflow: hidden; }
a { color: #6fb1ff; }
";

const SORT_SCRIPT: &str = r"
document.querySelectorAll('table.sortable').forEach(function (table) {
  table.querySelectorAll('th.sortable').forEach(function (th, col) {
    var asc = false;
    th.addEventListener('click', function () {
      asc = !asc;
      var body = table.tBodies[0];
      var rows = Array.prototype.slice.call(body.rows);
      rows.sort(function (a, b) {
        var x = a.cells[col].dataset.sort, y = b.cells[col].dataset.sort;
        var nx = parseFloat(x), ny = parseFloat(y);
        var cmp = (!isNaN(nx) && !isNaN(ny)) ? nx - ny : x.localeCompare(y);
        return asc ? cmp : -cmp;
      });
      rows.forEach(function (r) { body.appendChild(r); });
    });
  });
});
";

/// Width in pixels of a full-length bar.
const BAR_WIDTH: u64 = 320;

/// Render the self-contained HTML dashboard.
#[must_use]
pub fn render_html(data: &ReportData) -> String {
    let mut out = String::with_capacity(16 * 1024);
    // Writing to a String cannot fail.
    let _ = write_html(&mut out, data);
    out
}

/// Render the markdown summary printed to stdout.
#[must_use]
pub fn render_markdown(data: &ReportData) -> String {
    let mut out = String::with_capacity(4 * 1024);
    let _ = write_markdown(&mut out, data);
    out
}

fn write_html(out: &mut String, data: &ReportData) -> fmt::Result {
    let range = escape_html(&data.window.label());
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Facebook Insights {range}</title>")?;
    writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>")?;
    writeln!(
        out,
        "<header><h1>\u{1f4ca} Facebook Insights Dashboard</h1>\
         <p>Range: <strong>{range}</strong></p></header>"
    )?;

    write_kpis(out, data)?;
    write_daily_reactions(out, &data.daily)?;
    write_impressions_vs_reach(out, &data.posts)?;
    write_top_posts(out, &data.top_posts)?;
    write_reaction_split(out, data.totals.likes, data.totals.loves)?;
    write_best_day(out, &data.best_day)?;
    write_post_table(out, &data.posts)?;

    writeln!(out, "<script>{SORT_SCRIPT}</script>\n</body>\n</html>")
}

fn write_kpis(out: &mut String, data: &ReportData) -> fmt::Result {
    let t = &data.totals;
    let cards = [
        ("\u{1f5b1}\u{fe0f} Total Clicks", t.clicks),
        ("\u{1f44d} Total Reactions", t.reactions),
        ("\u{1f30d} Total Reach", t.reach),
        ("\u{2764}\u{fe0f} Love Reactions", t.loves),
        ("\u{1f44d} Like Reactions", t.likes),
        ("\u{1f441}\u{fe0f} Impressions", t.impressions),
    ];
    writeln!(out, "<section class=\"kpis\">")?;
    for (label, value) in cards {
        writeln!(
            out,
            "<div class=\"kpi\"><div class=\"label\">{label}</div>\
             <div class=\"value\">{}</div></div>",
            thousands(value)
        )?;
    }
    writeln!(out, "</section>")
}

fn write_daily_reactions(out: &mut String, daily: &[DailySummary]) -> fmt::Result {
    let max = daily
        .iter()
        .map(|d| d.totals.likes.saturating_add(d.totals.loves))
        .max()
        .unwrap_or(0);
    writeln!(out, "<section>\n<h2>\u{1f4ac} Daily Reaction Type Breakdown</h2>")?;
    writeln!(
        out,
        "<table>\n<thead><tr><th>Date</th><th>Day</th><th>Likes</th><th>Loves</th><th></th></tr></thead>\n<tbody>"
    )?;
    for day in daily {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td>{}{}</td></tr>",
            day.date,
            day.date.format("%A"),
            thousands(day.totals.likes),
            thousands(day.totals.loves),
            bar("likes", day.totals.likes, max),
            bar("loves", day.totals.loves, max),
        )?;
    }
    writeln!(out, "</tbody>\n</table>\n</section>")
}

fn write_impressions_vs_reach(out: &mut String, posts: &[PostRecord]) -> fmt::Result {
    let max = posts
        .iter()
        .map(|p| p.impressions.max(p.reach))
        .max()
        .unwrap_or(0);
    writeln!(out, "<section>\n<h2>\u{1f4c8} Total Impressions vs Reach</h2>")?;
    writeln!(
        out,
        "<table>\n<thead><tr><th>Created Time</th><th>Post</th><th>Impressions</th><th>Reach</th><th></th></tr></thead>\n<tbody>"
    )?;
    for post in posts {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td>{}<br>{}</td></tr>",
            post.created_time.format("%Y-%m-%d %H:%M"),
            escape_html(&excerpt(&post.content, 60)),
            thousands(post.impressions),
            thousands(post.reach),
            bar("impressions", post.impressions, max),
            bar("reach", post.reach, max),
        )?;
    }
    writeln!(out, "</tbody>\n</table>\n</section>")
}

fn write_top_posts(out: &mut String, top: &[PostRecord]) -> fmt::Result {
    let max = top.first().map_or(0, PostRecord::engagement_score);
    writeln!(
        out,
        "<section>\n<h2>\u{1f525} Top {} Posts by Engagement</h2>",
        top.len()
    )?;
    writeln!(
        out,
        "<table>\n<thead><tr><th>#</th><th>Post</th><th>Score</th><th>Clicks</th><th></th></tr></thead>\n<tbody>"
    )?;
    for (rank, post) in top.iter().enumerate() {
        let score = post.engagement_score();
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td></tr>",
            rank + 1,
            linked_excerpt(post),
            thousands(score),
            thousands(post.clicks),
            bar("clicks", score, max),
        )?;
    }
    writeln!(out, "</tbody>\n</table>\n</section>")
}

fn write_reaction_split(out: &mut String, likes: u64, loves: u64) -> fmt::Result {
    let like_pct = percent(likes, likes.saturating_add(loves));
    let love_pct = if likes == 0 && loves == 0 {
        0.0
    } else {
        100.0 - like_pct
    };
    writeln!(
        out,
        "<section>\n<h2>\u{2764}\u{fe0f} vs \u{1f44d} Reaction Distribution</h2>"
    )?;
    writeln!(
        out,
        "<div class=\"split\"><div class=\"likes\" style=\"width: {like_pct:.1}%\"></div>\
         <div class=\"loves\" style=\"width: {love_pct:.1}%\"></div></div>"
    )?;
    writeln!(
        out,
        "<p>Like Reactions: {} ({like_pct:.1}%) &middot; Love Reactions: {} ({love_pct:.1}%)</p>\n</section>",
        thousands(likes),
        thousands(loves),
    )
}

fn write_best_day(out: &mut String, best: &DailySummary) -> fmt::Result {
    writeln!(
        out,
        "<section class=\"callout\">\u{1f4c6} Best day to post based on Impressions + Reach: \
         <strong>{}</strong> ({}, {} impressions + reach)</section>",
        best.date.format("%A"),
        best.date,
        thousands(best.reach_score()),
    )
}

fn write_post_table(out: &mut String, posts: &[PostRecord]) -> fmt::Result {
    writeln!(out, "<section>\n<h2>\u{1f517} Clickable Post Links</h2>")?;
    writeln!(
        out,
        "<table class=\"sortable\">\n<thead><tr>\
         <th class=\"sortable\">Created Time</th><th class=\"sortable\">Content</th>\
         <th class=\"sortable\">Post Clicks</th><th class=\"sortable\">Total Reactions</th>\
         <th class=\"sortable\">Impressions</th><th class=\"sortable\">Reach</th>\
         <th>Permanent Link</th></tr></thead>\n<tbody>"
    )?;
    for post in posts {
        let created = post.created_time.format("%Y-%m-%d %H:%M").to_string();
        let content = escape_html(&post.content);
        writeln!(
            out,
            "<tr><td data-sort=\"{created}\">{created}</td>\
             <td data-sort=\"{content}\">{content}</td>\
             <td class=\"num\" data-sort=\"{clicks}\">{clicks_fmt}</td>\
             <td class=\"num\" data-sort=\"{reactions}\">{reactions_fmt}</td>\
             <td class=\"num\" data-sort=\"{impressions}\">{impressions_fmt}</td>\
             <td class=\"num\" data-sort=\"{reach}\">{reach_fmt}</td>\
             <td>{link}</td></tr>",
            clicks = post.clicks,
            clicks_fmt = thousands(post.clicks),
            reactions = post.reactions,
            reactions_fmt = thousands(post.reactions),
            impressions = post.impressions,
            impressions_fmt = thousands(post.impressions),
            reach = post.reach,
            reach_fmt = thousands(post.reach),
            link = view_link(post.link.as_deref()),
        )?;
    }
    writeln!(out, "</tbody>\n</table>\n</section>")
}

fn write_markdown(out: &mut String, data: &ReportData) -> fmt::Result {
    let t = &data.totals;
    writeln!(out, "# Facebook Insights Report")?;
    writeln!(out)?;
    writeln!(out, "**Range**: {}", data.window.label())?;
    writeln!(out, "**Posts**: {}", data.posts.len())?;
    writeln!(out)?;
    writeln!(out, "## Totals")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Total |")?;
    writeln!(out, "|--------|------:|")?;
    for (label, value) in [
        ("Clicks", t.clicks),
        ("Reactions", t.reactions),
        ("Reach", t.reach),
        ("Love Reactions", t.loves),
        ("Like Reactions", t.likes),
        ("Impressions", t.impressions),
    ] {
        writeln!(out, "| {label} | {} |", thousands(value))?;
    }
    writeln!(out)?;

    writeln!(out, "## Daily Summary")?;
    writeln!(out)?;
    writeln!(
        out,
        "| Date | Day | Posts | Clicks | Reactions | Likes | Loves | Reach | Impressions |"
    )?;
    writeln!(
        out,
        "|------|-----|------:|-------:|----------:|------:|------:|------:|------------:|"
    )?;
    for day in &data.daily {
        let d = &day.totals;
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            day.date,
            day.date.format("%A"),
            day.post_count,
            thousands(d.clicks),
            thousands(d.reactions),
            thousands(d.likes),
            thousands(d.loves),
            thousands(d.reach),
            thousands(d.impressions),
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Top Posts")?;
    writeln!(out)?;
    writeln!(out, "| # | Created | Post | Score |")?;
    writeln!(out, "|---|---------|------|------:|")?;
    for (rank, post) in data.top_posts.iter().enumerate() {
        let text = excerpt(&post.content, 60).replace('|', "\\|");
        let cell = match &post.link {
            Some(url) => format!("[{text}](<{}>)", markdown_destination(url)),
            None => text,
        };
        writeln!(
            out,
            "| {} | {} | {cell} | {} |",
            rank + 1,
            post.created_time.format("%Y-%m-%d %H:%M"),
            thousands(post.engagement_score()),
        )?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "**Best day**: {} ({}), {} impressions + reach",
        data.best_day.date.format("%A"),
        data.best_day.date,
        thousands(data.best_day.reach_score()),
    )
}

fn linked_excerpt(post: &PostRecord) -> String {
    let text = escape_html(&excerpt(&post.content, 80));
    match post.link.as_deref() {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{text}</a>",
            escape_html(url)
        ),
        None => text,
    }
}

fn view_link(url: Option<&str>) -> String {
    match url {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">View Post</a>",
            escape_html(url)
        ),
        None => String::new(),
    }
}

fn bar(class: &str, value: u64, max: u64) -> String {
    let width = if max == 0 {
        0
    } else {
        u64::try_from(u128::from(value) * u128::from(BAR_WIDTH) / u128::from(max)).unwrap_or(BAR_WIDTH)
    };
    format!("<span class=\"bar {class}\" style=\"width: {width}px\" title=\"{value}\"></span>")
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Format an integer with `,` thousands separators.
pub(crate) fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// First line of `s`, cut to `max_chars` with a trailing `...`.
/// Link target for the `<...>` form, which allows spaces and parentheses.
fn markdown_destination(url: &str) -> String {
    url.trim()
        .replace('<', "%3C")
        .replace('>', "%3E")
        .replace('|', "%7C")
        .replace(['\n', '\r'], "")
}

fn excerpt(s: &str, max_chars: usize) -> String {
    let line = s.lines().next().unwrap_or("").trim();
    if line.chars().count() > max_chars {
        format!("{}...", line.chars().take(max_chars).collect::<String>())
    } else {
        line.to_string()
    }
}
