//! Build metadata and `$NAME` expansion for user-supplied strings

/// Variables that may be referenced as `$NAME` in contexts and URLs, in expansion order
pub const WHITELISTED_VARIABLES: [&str; 6] = [
    "BUILD_ID",
    "BUILD_NAME",
    "BUILD_JOB_NAME",
    "BUILD_PIPELINE_NAME",
    "BUILD_TEAM_NAME",
    "ATC_EXTERNAL_URL",
];

/// Build metadata provided by the CI platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMetadata {
    /// `BUILD_ID`
    pub build_id: Option<String>,
    /// `BUILD_NAME`
    pub build_name: Option<String>,
    /// `BUILD_JOB_NAME`
    pub job_name: Option<String>,
    /// `BUILD_PIPELINE_NAME`
    pub pipeline_name: Option<String>,
    /// `BUILD_TEAM_NAME`
    pub team_name: Option<String>,
    /// `ATC_EXTERNAL_URL`
    pub external_url: Option<String>,
}

impl BuildMetadata {
    /// Read metadata from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read metadata through an arbitrary lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            build_id: lookup("BUILD_ID"),
            build_name: lookup("BUILD_NAME"),
            job_name: lookup("BUILD_JOB_NAME"),
            pipeline_name: lookup("BUILD_PIPELINE_NAME"),
            team_name: lookup("BUILD_TEAM_NAME"),
            external_url: lookup("ATC_EXTERNAL_URL"),
        }
    }

    /// Value of a whitelisted variable, `None` if unset or not whitelisted
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "BUILD_ID" => &self.build_id,
            "BUILD_NAME" => &self.build_name,
            "BUILD_JOB_NAME" => &self.job_name,
            "BUILD_PIPELINE_NAME" => &self.pipeline_name,
            "BUILD_TEAM_NAME" => &self.team_name,
            "ATC_EXTERNAL_URL" => &self.external_url,
            _ => return None,
        };
        value.as_deref()
    }

    /// Replace each whitelisted `$NAME` in `template` with its value
    ///
    /// Unset variables expand to the empty string. Other `$TOKENS` are left alone.
    pub fn expand(&self, template: &str) -> String {
        WHITELISTED_VARIABLES
            .iter()
            .fold(template.to_string(), |acc, name| {
                acc.replace(&format!("${name}"), self.get(name).unwrap_or_default())
            })
    }
}
