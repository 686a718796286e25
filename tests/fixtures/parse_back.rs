//! Renders templates with hostile values and parses the output back the way a
//! browser would. A value must never change the structure of the document.

use crate::harness::tokens::{self, TestToken};
use crate::harness::Template;
use autoesc::Settings;

static HOSTILE_VALUES: &[&str] = &[
    "<script>alert(1)</script>",
    "\"><img src=x onerror=alert(1)>",
    "' onmouseover='alert(1)",
    " onclick=alert(1) ",
    "x onclick=alert(1)",
    "--><script>alert(1)</script><!--",
    "--!><b>",
    "</script><script>alert(1)</script>",
    "</style><script>alert(1)</script>",
    "</title><script>alert(1)</script>",
    "</textarea><script>alert(1)</script>",
    "javascript:alert(1)",
    "javascript&#58;alert(1)",
    "&#106;avascript:alert(1)",
    "#106;avascript:alert(1)",
    "&lt;script&gt;",
    "&quot; onclick=&quot;alert(1)",
    "\\",
    "\\'",
    "*/ alert(1); /*",
    "\n alert(1) //",
    "\u{2028}alert(1)",
    "${alert(1)}",
    "`",
    "=",
    ">",
    "<",
    "</",
    "<!--",
    "<![CDATA[",
    "\0",
];

static TEMPLATES: &[&str] = &[
    "<p>{{}}</p>",
    "<p title=\"{{}}\">x</p>",
    "<p title='{{}}'>x</p>",
    "<p title={{}}>x</p>",
    "<p title={{}} class=y>x</p>",
    "<p title=a{{}}>x</p>",
    "<p title={{}}{{}}>x</p>",
    "<a href=\"{{}}\">x</a>",
    "<a href={{}}>x</a>",
    "<a href=\"&{{}}\">x</a>",
    "<a href=\"&#{{}}\">x</a>",
    "<a href=\"/search?q={{}}\">x</a>",
    "<a href=\"/users/{{}}\">x</a>",
    "<a onclick=\"f({{}})\">x</a>",
    "<a onclick=\"f('{{}}')\">x</a>",
    "<a onclick=\"f('&{{}}')\">x</a>",
    "<a onclick=f({{}})>x</a>",
    "<p style=\"color: {{}}\">x</p>",
    "<p style=\"background: url({{}})\">x</p>",
    "<script>var a = {{}};</script><b>x</b>",
    "<script>var a = '{{}}';</script><b>x</b>",
    "<script>var a = \"{{}}\";</script><b>x</b>",
    "<script>var a = `{{}}`;</script><b>x</b>",
    "<script>var a = /{{}}/;</script><b>x</b>",
    "<script>// {{}}\n</script><b>x</b>",
    "<script>/* {{}} */</script><b>x</b>",
    "<style>p { color: {{}} }</style><b>x</b>",
    "<style>p { background: url('{{}}') }</style><b>x</b>",
    "<textarea>{{}}</textarea><b>x</b>",
    "<title>{{}}</title><b>x</b>",
    "<!-- {{}} --><b>x</b>",
];

fn structure(output: &str) -> Vec<TestToken> {
    tokens::get(output)
        .iter()
        .filter(|token| !matches!(token, TestToken::Text(_)))
        .map(TestToken::shape)
        .collect()
}

fn settings(soft: bool) -> Settings {
    Settings {
        soft,
        ..Settings::default()
    }
}

#[test]
fn values_dont_change_structure() {
    for soft in [false, true] {
        for source in TEMPLATES {
            let template = Template::from(*source);
            let expected = structure(&template.with_values("x").render_to_string(settings(soft)));

            for value in HOSTILE_VALUES {
                let output = template.with_values(value).render_to_string(settings(soft));

                assert!(
                    structure(&output) == expected,
                    "soft: {soft}\ntemplate: {source:?}\nvalue: {value:?}\noutput: {output:?}"
                );
            }
        }
    }
}

#[test]
fn values_dont_inject_names() {
    let templates = ["<{{}} class=x>y", "<p {{}}=x>y", "<p on{{}}=x>y", "<scr{{}}>y"];

    let is_dangerous_tag = |name: &str| {
        ["script", "style", "iframe", "img", "textarea", "title"].contains(&name)
    };

    let is_dangerous_attr = |name: &str| {
        name.starts_with("on") && name != "on" || ["href", "src", "style"].contains(&name)
    };

    for source in templates {
        let template = Template::from(source);

        for value in HOSTILE_VALUES.iter().chain(&["script", "onclick", "style", "ipt", "click"]) {
            let output = template.with_values(value).render_to_string(Settings::default());

            for token in tokens::get(&output) {
                if let TestToken::StartTag { name, attributes } = token {
                    assert!(
                        !is_dangerous_tag(&name),
                        "template: {source:?}\nvalue: {value:?}\noutput: {output:?}"
                    );

                    for (attr, _) in attributes {
                        assert!(
                            !is_dangerous_attr(&attr) || attr == "onzautoescz",
                            "template: {source:?}\nvalue: {value:?}\noutput: {output:?}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn unsafe_urls_are_replaced() {
    for source in ["<a href=\"{{}}\">x</a>", "<a href={{}}>x</a>", "<img src='{{}}'>"] {
        let urls = ["javascript:alert(1)", "JavaScript:alert(1)", "vbscript:x", "data:text/html,x"];

        for url in urls {
            let output = Template::from(source)
                .with_values(url)
                .render_to_string(Settings::default());

            for token in tokens::get(&output) {
                if let TestToken::StartTag { attributes, .. } = token {
                    assert_eq!(attributes[0].1, "#ZautoescZ", "{output}");
                }
            }
        }
    }
}

#[test]
fn decoded_urls_keep_safe_schemes() {
    let templates = [
        "<a href=\"{{}}\">x</a>",
        "<a href={{}}>x</a>",
        "<a href=\"&{{}}\">x</a>",
        "<a href=\"&#{{}}\">x</a>",
        "<a href='&#x{{}}'>x</a>",
        "<a href=\"&#10{{}}\">x</a>",
        "<a href=\"java{{}}\">x</a>",
    ];

    let urls = [
        "javascript:alert(1)",
        "javascript&#58;alert(1)",
        "javascript&colon;alert(1)",
        "&#106;avascript:alert(1)",
        "#106;avascript:alert(1)",
        "6a;avascript:alert(1)",
        "6;avascript:alert(1)",
        "script:alert(1)",
        "script&#58;alert(1)",
        " javascript:alert(1)",
        "java\tscript:alert(1)",
    ];

    for soft in [false, true] {
        for source in templates {
            for url in urls {
                let output = Template::from(source)
                    .with_values(url)
                    .render_to_string(settings(soft));

                for token in tokens::get(&output) {
                    if let TestToken::StartTag { attributes, .. } = token {
                        let href: String = attributes[0]
                            .1
                            .chars()
                            .filter(|ch| !matches!(ch, '\t' | '\n' | '\r'))
                            .collect();

                        let href = href.trim_start_matches(|ch| ch <= ' ').to_ascii_lowercase();

                        assert!(
                            !href.starts_with("javascript:"),
                            "soft: {soft}\ntemplate: {source:?}\nurl: {url:?}\noutput: {output:?}"
                        );
                    }
                }
            }
        }
    }
}
