//! Which event a preview cell fetches.

/// REST query naming the event shown in a hover preview.
///
/// With a concrete event at hand the preview fetches it directly;
/// otherwise it falls back to the issue's latest event, collapsed to the
/// stack-trace-only representation since nothing else is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewQuery {
    /// Latest event of an issue, stack trace only.
    Latest {
        /// Issue identifier.
        issue_id: String,
    },
    /// A specific event of a project.
    Specific {
        /// Organization slug.
        organization_slug: String,
        /// Project slug.
        project_slug: String,
        /// Event identifier.
        event_id: String,
    },
}

impl PreviewQuery {
    /// Render the API path for this query.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Latest { issue_id } => {
                format!("/issues/{issue_id}/events/latest/?collapse=stacktraceOnly")
            }
            Self::Specific {
                organization_slug,
                project_slug,
                event_id,
            } => format!("/projects/{organization_slug}/{project_slug}/events/{event_id}/"),
        }
    }
}
