use pages_core::{AppViewModel, RegionContent, RegionView};

/// Text rendition of the popup: input fields, both output regions, then the
/// history with the newest entry first.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("URL:      {}\n", view.url_input));
    out.push_str(&format!("Question: {}\n", view.question_input));
    if let Some(staged) = &view.staged_question {
        if view.question_input != *staged {
            out.push_str(&format!("          (selected text: {staged})\n"));
        }
    }
    push_region(&mut out, "Summary", &view.summary);
    push_region(&mut out, "Answer", &view.answer);

    if !view.history.is_empty() {
        out.push_str(&format!("--- History ({}) ---\n", view.history.len()));
        for entry in &view.history {
            out.push_str(&format!("Q: {}\n", entry.question));
            out.push_str(&format!("A: {}\n", entry.answer_html.trim_end()));
        }
    }
    out
}

fn push_region(out: &mut String, title: &str, region: &RegionView) {
    let marker = if region.loading { " [loading]" } else { "" };
    out.push_str(&format!("--- {title}{marker} ---\n"));
    match &region.content {
        RegionContent::Empty => {}
        RegionContent::Text(text) | RegionContent::Html(text) => {
            out.push_str(text.trim_end());
            out.push('\n');
        }
    }
}
