use crate::{
    models::ImageSize,
    studio::{FlowSnapshot, StudioSnapshot},
};
use std::fmt::Write;

const STYLE: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: #0f1115; color: #e8e8ea; }
.app { max-width: 1200px; margin: 0 auto; padding: 32px 24px 48px; }
.hero { margin-bottom: 32px; }
.eyebrow { text-transform: uppercase; letter-spacing: .12em; font-size: 12px; color: #8b8fa3; }
.subtitle { color: #a9acbb; max-width: 640px; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 24px; }
.panel { background: #181b22; border-radius: 16px; padding: 24px; display: flex; flex-direction: column; gap: 16px; }
.panel-header p { color: #a9acbb; margin: 4px 0 0; }
.form { display: flex; flex-direction: column; gap: 12px; }
.field { display: flex; flex-direction: column; gap: 6px; font-size: 14px; }
textarea, select { background: #0f1115; color: inherit; border: 1px solid #2c3040; border-radius: 8px; padding: 10px; font: inherit; }
button { background: #6c5ce7; color: #fff; border: 0; border-radius: 8px; padding: 10px 16px; font-weight: 600; cursor: pointer; }
button:disabled { opacity: .6; cursor: progress; }
.error { color: #ff7675; margin: 0; }
.preview { min-height: 280px; border: 1px dashed #2c3040; border-radius: 12px; display: flex; align-items: center; justify-content: center; overflow: hidden; }
.preview img { max-width: 100%; display: block; }
.placeholder { color: #6b6f80; }
.reset { align-self: flex-start; background: transparent; border: 1px solid #2c3040; }
"#;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn submit_button(flow: &FlowSnapshot, idle_label: &str, busy_label: &str) -> String {
    if flow.is_loading() {
        format!(r#"<button type="submit" disabled>{}</button>"#, busy_label)
    } else {
        format!(r#"<button type="submit">{}</button>"#, idle_label)
    }
}

fn error_line(flow: &FlowSnapshot) -> String {
    match &flow.error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape_html(message)),
        None => String::new(),
    }
}

fn preview(flow: &FlowSnapshot, alt: &str, placeholder: &str) -> String {
    match &flow.artifact {
        Some(artifact) => format!(
            r#"<div class="preview"><img src="{}" alt="{}" /></div>"#,
            escape_html(&artifact.data_uri()),
            alt
        ),
        None => format!(
            r#"<div class="preview"><div class="placeholder"><p>{}</p></div></div>"#,
            placeholder
        ),
    }
}

fn size_options(selected: ImageSize) -> String {
    let mut options = String::new();
    for size in ImageSize::ALL {
        let _ = write!(
            options,
            r#"<option value="{0}"{1}>{0}</option>"#,
            size.as_str(),
            if size == selected { " selected" } else { "" }
        );
    }
    options
}

fn generate_panel(snapshot: &StudioSnapshot) -> String {
    format!(
        r#"<section class="panel">
  <div class="panel-header">
    <h2>Generate an image</h2>
    <p>Describe what you want the model to create.</p>
  </div>
  <form method="post" action="/generate" class="form">
    <label class="field">
      <span>Prompt</span>
      <textarea name="prompt" rows="4" required placeholder="A cinematic photo of a lighthouse on a cliff at sunset">{prompt}</textarea>
    </label>
    <label class="field">
      <span>Output size</span>
      <select name="size">{options}</select>
    </label>
    {button}
    {error}
  </form>
  {preview}
</section>"#,
        prompt = escape_html(&snapshot.prompt),
        options = size_options(snapshot.size),
        button = submit_button(&snapshot.generate, "Generate image", "Generating..."),
        error = error_line(&snapshot.generate),
        preview = preview(
            &snapshot.generate,
            "Generated",
            "Your generated image will appear here."
        ),
    )
}

fn edit_panel(snapshot: &StudioSnapshot) -> String {
    format!(
        r#"<section class="panel">
  <div class="panel-header">
    <h2>Edit the generated image</h2>
    <p>Refine the last generated image with an edit prompt.</p>
  </div>
  <form method="post" action="/edit" class="form">
    <label class="field">
      <span>Edit prompt</span>
      <textarea name="edit_prompt" rows="4" required placeholder="Add stormy clouds and dramatic lighting">{prompt}</textarea>
    </label>
    {button}
    {error}
  </form>
  {preview}
</section>"#,
        prompt = escape_html(&snapshot.edit_prompt),
        button = submit_button(&snapshot.edit, "Edit image", "Editing..."),
        error = error_line(&snapshot.edit),
        preview = preview(&snapshot.edit, "Edited", "Your edited image will appear here."),
    )
}

/// Keeps the page polling while a request is running.
fn refresh_tag(snapshot: &StudioSnapshot) -> &'static str {
    if snapshot.generate.is_loading() || snapshot.edit.is_loading() {
        "<meta http-equiv=\"refresh\" content=\"2\" />\n"
    } else {
        ""
    }
}

pub fn page(snapshot: &StudioSnapshot) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
{refresh}<title>pixelprompt</title>
<style>{style}</style>
</head>
<body>
<div class="app">
  <header class="hero">
    <div>
      <p class="eyebrow">Image generation demo</p>
      <h1>Generate and edit images with prompts</h1>
      <p class="subtitle">Use the left column to generate an image, then refine it with an edit prompt in the right column.</p>
    </div>
    <form method="post" action="/reset"><button type="submit" class="reset">Start over</button></form>
  </header>
  <main class="grid">
{generate}
{edit}
  </main>
</div>
</body>
</html>
"#,
        style = STYLE,
        refresh = refresh_tag(snapshot),
        generate = generate_panel(snapshot),
        edit = edit_panel(snapshot),
    )
}
