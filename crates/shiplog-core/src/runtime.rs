use shiplog_types::HostVersion;

/// Version of this library, shipped with every record
pub const LOGGER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-level facts fixed at bootstrap
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeInfo {
    pub environment: Option<String>,
    pub host_version: HostVersion,
    pub running_in_console: bool,
    /// Command-line arguments of the invocation, program name first
    pub argv: Vec<String>,
}

impl RuntimeInfo {
    pub fn new(host_version: HostVersion) -> Self {
        Self {
            environment: None,
            host_version,
            running_in_console: false,
            argv: Vec::new(),
        }
    }

    /// Capture argv from the current process
    pub fn from_process(
        environment: impl Into<String>,
        host_version: HostVersion,
        running_in_console: bool,
    ) -> Self {
        Self {
            environment: Some(environment.into()),
            host_version,
            running_in_console,
            argv: std::env::args().collect(),
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn in_console<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.running_in_console = true;
        self.argv = argv.into_iter().map(Into::into).collect();
        self
    }

    /// Full command line when running in console
    pub fn command_line(&self) -> Option<String> {
        if self.running_in_console && !self.argv.is_empty() {
            Some(self.argv.join(" "))
        } else {
            None
        }
    }
}
