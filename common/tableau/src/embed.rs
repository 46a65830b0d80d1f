/// Path of the v3 embedding bootstrap script on a Tableau host.
pub const EMBEDDING_MODULE_PATH: &str = "/javascripts/api/tableau.embedding.3.latest.min.js";

/// Append the vendor embed parameters and the api token to a view URL.
///
/// The result is rendered straight into an iframe, so the token is visible
/// in the page DOM; acceptable only because the token is short-lived and
/// scoped to view embedding.
pub fn build_view_url(base_view_url: &str, token: &str) -> String {
    let delim = if base_view_url.contains('?') { '&' } else { '?' };
    format!("{base_view_url}{delim}:embed=y&:showVizHome=n&:toolbar=n&:api_token={token}")
}

/// Embedding script URL for the configured host.
pub fn embedding_module_url(host: &str) -> String {
    format!("{}{}", host.trim_end_matches('/'), EMBEDDING_MODULE_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_with_question_mark_when_no_query() {
        assert_eq!(
            build_view_url("https://x/view", "T"),
            "https://x/view?:embed=y&:showVizHome=n&:toolbar=n&:api_token=T"
        );
    }

    #[test]
    fn appends_with_ampersand_when_query_present() {
        assert_eq!(
            build_view_url("https://x/view?a=1", "T"),
            "https://x/view?a=1&:embed=y&:showVizHome=n&:toolbar=n&:api_token=T"
        );
    }

    #[test]
    fn module_url_tolerates_trailing_slash() {
        assert_eq!(
            embedding_module_url("https://prod-in-a.online.tableau.com/"),
            "https://prod-in-a.online.tableau.com/javascripts/api/tableau.embedding.3.latest.min.js"
        );
    }
}
