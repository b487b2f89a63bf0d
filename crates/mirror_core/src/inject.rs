macro_rules! network_guard_js {
    () => {
        r#"
  window.XMLHttpRequest = class {
    open() {}
    send() {}
    setRequestHeader() {}
  };
  window.fetch = () => Promise.reject('fetch is disabled');
"#
    };
}

/// Script body that turns `XMLHttpRequest` into a no-op and makes `fetch`
/// reject. Installed into the live page before navigation.
pub const NETWORK_GUARD_JS: &str = network_guard_js!();

/// [`NETWORK_GUARD_JS`] wrapped in a `<script>` tag, for embedding into saved
/// pages so they cannot reach the network when opened later.
pub const NETWORK_GUARD_SCRIPT: &str = concat!("<script>", network_guard_js!(), "</script>");

const HEAD_CLOSE: &str = "</head>";

/// Insert [`NETWORK_GUARD_SCRIPT`] right before the first `</head>`.
///
/// Markup without a closing head tag is returned unchanged.
pub fn inject_network_guard(html: &str) -> String {
    html.replacen(HEAD_CLOSE, &format!("{NETWORK_GUARD_SCRIPT}{HEAD_CLOSE}"), 1)
}
