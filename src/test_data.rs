#[cfg(test)]
pub const POST_DATA_MD: &str = "<!--
[ID]: # (a63bd715-a3fe-4788-b0e1-2a3153778544)
[DATE]: # (2022-04-02 12:05:00.000)
[AUTHOR]: # (thiago)
[TAGS]: # (career rust)
[CATEGORIES]: # (Software Engineering)
-->

# What I learned after 20+ years of software development
How to be a great software engineer?

<!-- more -->

## Non technical

The earlier you find that, __the better__.

![diagram](diagram.png)
";

#[cfg(test)]
pub const POST_DATA_HTML: &str = r#"<!--
[ID]: # (cbca23f4-9cb9-11ea-a1df-83d8f0a5e3cb)
[DATE]: # (2024-03-01 10:00:00)
[AUTHOR]: # (thiago)
[TAGS]: # (html)
[CATEGORIES]: # (News)
-->
<h1>Hello from HTML</h1>
<p>Paragraph with <strong>bold</strong> text.</p>
<img src="diagram.png">
"#;

/// Writes a post directory `<posts_dir>/<link>/index.md`
#[cfg(test)]
pub fn write_post(posts_dir: &std::path::Path, link: &str, date: &str, tags: &str, categories: &str, title: &str) {
    let post_dir = posts_dir.join(link);
    std::fs::create_dir_all(&post_dir).unwrap();
    let content = format!(
        "<!--\n[ID]: # ({link}-id)\n[DATE]: # ({date})\n[AUTHOR]: # (thiago)\n[TAGS]: # ({tags})\n[CATEGORIES]: # ({categories})\n-->\n\n# {title}\n\nBody of *{title}*.\n"
    );
    std::fs::write(post_dir.join("index.md"), content).unwrap();
}
