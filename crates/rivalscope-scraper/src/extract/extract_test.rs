use super::*;

const URL: &str = "https://acme.io";

fn low_threshold() -> ExtractLimits {
    ExtractLimits {
        min_primary_chars: 10,
        ..ExtractLimits::default()
    }
}

fn landing_page() -> String {
    r#"<!doctype html>
<html>
<head>
  <title>Acme &amp; Co | Rockets</title>
  <meta name="description" content="Reusable rockets for small teams">
  <meta property="og:title" content="Acme Rockets">
  <meta name="viewport" content="width=device-width">
  <script>var tracking = "do not include me";</script>
  <style>.hero { color: red; }</style>
</head>
<body>
  <header><nav><a href="/">Home</a> <a href="/pricing">Pricing</a></nav></header>
  <main>
    <h1>Launch faster</h1>
    <p>Acme builds reusable rockets for small teams.</p>
    <article><p>Customer story: orbit in a week.</p></article>
  </main>
  <section id="about-us"><h2>About Acme</h2><p>Founded in 2019 by rocket people.</p></section>
  <footer><a href="https://partner.example.com/acme">Partner program</a></footer>
</body>
</html>"#
        .to_string()
}

// -----------------------------------------------------------------------
// structured pass
// -----------------------------------------------------------------------

#[test]
fn sections_appear_in_priority_order() {
    let page = extract_page(&landing_page(), URL, &low_threshold());
    let text = &page.text_content;

    let main = text.find("## Main Content").expect("main section");
    let pricing = text.find("## Pricing Links").expect("pricing section");
    let about = text.find("## About").expect("about section");
    let header = text.find("## Header").expect("header section");
    let footer = text.find("## Footer").expect("footer section");
    assert!(main < pricing && pricing < about && about < header && header < footer);
}

#[test]
fn scripts_and_styles_never_reach_the_transcript() {
    let page = extract_page(&landing_page(), URL, &low_threshold());
    assert!(!page.text_content.contains("do not include me"));
    assert!(!page.text_content.contains("color: red"));
}

#[test]
fn nested_main_content_is_counted_once() {
    let page = extract_page(&landing_page(), URL, &low_threshold());
    assert_eq!(
        page.text_content.matches("orbit in a week").count(),
        1,
        "article inside main must not be duplicated: {}",
        page.text_content
    );
}

#[test]
fn pricing_links_are_resolved_against_the_page() {
    let page = extract_page(&landing_page(), URL, &low_threshold());
    assert!(page
        .text_content
        .contains("- Pricing: https://acme.io/pricing"));
}

#[test]
fn pricing_links_match_on_visible_text() {
    let html = r#"<body><main><p>Some product copy here</p></main>
        <a href="/buy">See our Plans</a></body>"#;
    let page = extract_page(html, URL, &low_threshold());
    assert!(page.text_content.contains("- See our Plans: https://acme.io/buy"));
}

#[test]
fn about_section_found_by_heading_and_id() {
    let page = extract_page(&landing_page(), URL, &low_threshold());
    assert!(page.text_content.contains("Founded in 2019"));
    assert_eq!(page.text_content.matches("Founded in 2019").count(), 1);
}

#[test]
fn about_heading_under_body_takes_only_its_own_block() {
    let filler = "Rockets and more rockets for every team. ".repeat(30);
    let html = format!(
        r#"<html><body>
  <main><h1>Acme</h1><p>{filler}</p></main>
  <h2>About us</h2>
  <p>We are Acme.</p>
  <p>Founded in 2019.</p>
  <h2>Careers</h2>
  <p>We are hiring.</p>
  <footer><p>Copyright Acme</p></footer>
</body></html>"#
    );
    let page = extract_page(&html, URL, &low_threshold());
    let text = &page.text_content;

    let start = text.find("## About\n").expect("about section") + "## About\n".len();
    let about = text[start..].split("\n\n").next().unwrap_or_default();
    assert_eq!(about, "About us We are Acme. Founded in 2019.");
    assert_eq!(text.matches("Rockets and more rockets").count(), 30);
}

#[test]
fn about_class_on_body_is_not_an_about_section() {
    let html = r#"<html><body class="about-page">
  <main><p>Acme builds reusable rockets for small teams.</p></main>
  <footer>Copyright Acme</footer>
</body></html>"#;
    let page = extract_page(html, URL, &low_threshold());
    assert!(!page.text_content.contains("## About"));
}

#[test]
fn title_and_entities_are_decoded() {
    let page = extract_page(&landing_page(), URL, &low_threshold());
    assert_eq!(page.title, "Acme & Co | Rockets");
}

#[test]
fn only_allowlisted_meta_tags_are_kept() {
    let page = extract_page(&landing_page(), URL, &low_threshold());
    assert_eq!(
        page.meta_tags.get("description").map(String::as_str),
        Some("Reusable rockets for small teams")
    );
    assert_eq!(
        page.meta_tags.get("og:title").map(String::as_str),
        Some("Acme Rockets")
    );
    assert!(!page.meta_tags.contains_key("viewport"));
}

#[test]
fn thin_sections_fall_back_to_body_text() {
    let html = "<html><body><div><p>Just a plain page with a paragraph.</p></div></body></html>";
    let page = extract_page(html, URL, &ExtractLimits::default());
    assert_eq!(page.text_content, "Just a plain page with a paragraph.");
    assert!(!page.text_content.contains("## "));
}

// -----------------------------------------------------------------------
// links
// -----------------------------------------------------------------------

#[test]
fn links_skip_fragments_scripts_and_short_text() {
    let html = r##"<body>
        <a href="#top">Back to top</a>
        <a href="javascript:void(0)">Open menu</a>
        <a href="JavaScript:alert(1)">Alert</a>
        <a href="/docs">Docs</a>
        <a href="/x">x</a>
        <a href="https://blog.acme.io/">Blog</a>
    </body>"##;
    let page = extract_page(html, URL, &ExtractLimits::default());
    let urls: Vec<&str> = page.links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(urls, vec!["https://acme.io/docs", "https://blog.acme.io/"]);
}

#[test]
fn duplicate_link_targets_are_collapsed() {
    let html = r#"<body><a href="/docs">Docs</a><a href="/docs">Documentation</a></body>"#;
    let page = extract_page(html, URL, &ExtractLimits::default());
    assert_eq!(page.links.len(), 1);
    assert_eq!(page.links[0].text, "Docs");
}

// -----------------------------------------------------------------------
// budgets
// -----------------------------------------------------------------------

#[test]
fn text_and_links_are_clamped_for_large_pages() {
    let mut html = String::from("<html><body><main>");
    for i in 0..2_000 {
        html.push_str(&format!(
            "<p>Paragraph {i} about reusable rockets.</p><a href=\"/p/{i}\">Page {i}</a>"
        ));
    }
    html.push_str("</main></body></html>");

    let limits = ExtractLimits {
        max_text_chars: 500,
        max_links: 7,
        ..ExtractLimits::default()
    };
    let page = extract_page(&html, URL, &limits);
    assert!(page.text_content.chars().count() <= 500);
    assert_eq!(page.links.len(), 7);
}

#[test]
fn degenerate_inputs_stay_within_budget() {
    let limits = ExtractLimits {
        max_text_chars: 20,
        max_links: 2,
        ..ExtractLimits::default()
    };
    for html in [
        "",
        "<",
        "<<<>>>",
        "<html><body>",
        "</div></div></span>",
        "plain text with no markup at all, quite a bit longer than twenty chars",
        "<a href='/a'>aa</a><a href='/b'>bb</a><a href='/c'>cc</a>",
        "<script>unterminated",
    ] {
        let page = extract_page(html, URL, &limits);
        assert!(page.text_content.chars().count() <= 20, "input {html:?}");
        assert!(page.links.len() <= 2, "input {html:?}");
    }
}

#[test]
fn truncation_respects_multibyte_characters() {
    let html = format!("<body><p>{}</p></body>", "é".repeat(100));
    let limits = ExtractLimits {
        max_text_chars: 33,
        ..ExtractLimits::default()
    };
    let page = extract_page(&html, URL, &limits);
    assert_eq!(page.text_content.chars().count(), 33);
}

#[test]
fn truncate_chars_keeps_short_input() {
    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("abcdef", 3), "abc");
    assert_eq!(truncate_chars("", 0), "");
}

// -----------------------------------------------------------------------
// regex pass
// -----------------------------------------------------------------------

#[test]
fn regex_pass_reads_attributes_in_any_order() {
    let html = r#"<html><head><title>Acme</title>
        <meta content="Rockets" name="description">
        <meta property='og:description' content='Orbit for all'>
        </head><body><p>Hello &amp; welcome</p>
        <a class="nav" href="/team">Our team</a></body></html>"#;
    let base = reqwest::Url::parse(URL).ok();
    let page = fallback::extract(html, URL, base.as_ref(), &ExtractLimits::default());

    assert_eq!(page.title, "Acme");
    assert_eq!(
        page.meta_tags.get("description").map(String::as_str),
        Some("Rockets")
    );
    assert_eq!(
        page.meta_tags.get("og:description").map(String::as_str),
        Some("Orbit for all")
    );
    assert!(page.text_content.contains("Hello & welcome"));
    assert_eq!(page.links[0].url, "https://acme.io/team");
    assert_eq!(page.links[0].text, "Our team");
}

#[test]
fn regex_pass_without_base_keeps_absolute_links_only() {
    let html = r#"<body><a href="/rel">Relative</a><a href="https://x.io/a">Absolute</a></body>"#;
    let page = fallback::extract(html, "not a url", None, &ExtractLimits::default());
    assert_eq!(page.links.len(), 1);
    assert_eq!(page.links[0].url, "https://x.io/a");
}

#[test]
fn strip_non_text_removes_comments_and_scripts() {
    let stripped = text::strip_non_text("a<!-- hidden -->b<SCRIPT type=x>c</script >d");
    assert!(!stripped.contains("hidden"));
    assert!(!stripped.contains('c'));
    assert!(stripped.contains('a') && stripped.contains('d'));
}
