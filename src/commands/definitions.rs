//! Slash-command definitions registered with the chat platform.

/// Type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Integer,
}

/// One option of a slash command.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
}

/// A slash command as registered with the platform.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionSpec>,
}

impl CommandSpec {
    fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            options: Vec::new(),
        }
    }

    fn option(
        mut self,
        name: &'static str,
        description: &'static str,
        kind: OptionKind,
        required: bool,
    ) -> Self {
        self.options.push(OptionSpec {
            name,
            description,
            kind,
            required,
        });
        self
    }
}

/// All commands the bot answers.
pub fn definitions() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("favorites", "Show saved jobs"),
        CommandSpec::new("clear_favorites", "Clear all saved jobs"),
        CommandSpec::new("export_favorites", "Export saved jobs as CSV (disabled)"),
        CommandSpec::new("config", "Update job search settings")
            .option("location", "Job location", OptionKind::String, true)
            .option("radius", "Search radius in km", OptionKind::Integer, true)
            .option("keywords", "Comma-separated keywords", OptionKind::String, true)
            .option(
                "work_type",
                "Type: remote, hybrid, onsite, all",
                OptionKind::String,
                false,
            ),
        CommandSpec::new("show_config", "Show current search configuration"),
        CommandSpec::new("set_time", "Set daily job search time (HH:MM)").option(
            "time",
            "Format: HH:MM (e.g. 14:00)",
            OptionKind::String,
            true,
        ),
    ]
}
