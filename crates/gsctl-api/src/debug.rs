// Debug report capture
//
// Collects raw pages for troubleshooting unsupported firmware. Individual
// fetch failures are recorded in the report instead of aborting it.

use tracing::debug;

use crate::client::{SessionToken, SwitchClient};
use crate::records::DebugPage;

/// Pages fetched without credentials on every switch.
const PUBLIC_PAGES: [&str; 4] = ["/", "/login.cgi", "/wmi/login", "/redirect.html"];

impl SwitchClient {
    /// Fetch the public pages and, with a session, the family's admin pages.
    pub async fn debug_report(&self, session: Option<&SessionToken>) -> Vec<DebugPage> {
        let mut pages = Vec::new();

        for path in PUBLIC_PAGES {
            let page = match self.get_public(path).await {
                Ok((status, body)) => captured(self, path, false, Some(status), body),
                Err(err) => captured(self, path, false, None, err.to_string()),
            };
            pages.push(page);
        }

        if let Some(session) = session {
            for &path in session.family().diagnostic_paths() {
                let page = match self.get_raw(path, session).await {
                    Ok((status, body)) => captured(self, path, true, Some(status), body),
                    Err(err) => captured(self, path, true, None, err.to_string()),
                };
                pages.push(page);
            }
        }

        debug!(pages = pages.len(), "debug report captured");
        pages
    }
}

fn captured(
    client: &SwitchClient,
    path: &str,
    authenticated: bool,
    status: Option<u16>,
    body: String,
) -> DebugPage {
    let url = client
        .page_url(path)
        .map_or_else(|_| path.to_owned(), |u| u.to_string());
    DebugPage {
        url,
        authenticated,
        status,
        body,
    }
}
