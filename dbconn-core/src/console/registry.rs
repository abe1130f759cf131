//! Command registry: a declarative table of command patterns.
//!
//! A line resolves in two passes. Whole-line literals (`quit`, `list tables`)
//! are tried first. Token patterns follow, ordered by literal prefix length
//! descending, then minimum arity descending, then declaration order, so
//! `export schema x` can never be captured by a shorter `export` pattern.

use std::cmp::Reverse;

/// What a resolved line asks the console to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Quit,
    Debug,
    DebugOn,
    DebugOff,
    Connect,
    CloseDatabase,
    CheckDatabase,
    ListTables,
    ListSchemas,
    SelectSchema,
    SelectConnection,
    DescribeTable,
    CountTables,
    CountRows,
    ExportData,
    ExportSchema,
    Connections,
    Now,
    Time,
    DbInfo,
    Version,
}

/// How a command is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// The whole line, whitespace-normalized and case-insensitive.
    Line(&'static str),
    /// Leading literal phrases plus a phrase count within `min..=max`.
    Tokens {
        literals: &'static [&'static str],
        min: usize,
        max: Option<usize>,
    },
}

impl MatchRule {
    fn matches(&self, phrases: &[String]) -> bool {
        match *self {
            MatchRule::Line(text) => {
                let words: Vec<&str> = text.split(' ').collect();
                phrases.len() == words.len() && literals_match(&words, phrases)
            }
            MatchRule::Tokens { literals, min, max } => {
                phrases.len() >= min
                    && max.is_none_or(|max| phrases.len() <= max)
                    && literals_match(literals, phrases)
            }
        }
    }

    fn arity(&self) -> (usize, Option<usize>) {
        match *self {
            MatchRule::Line(text) => {
                let count = text.split(' ').count();
                (count, Some(count))
            }
            MatchRule::Tokens { min, max, .. } => (min, max),
        }
    }

    fn literals(&self) -> Vec<&'static str> {
        match *self {
            MatchRule::Line(text) => text.split(' ').collect(),
            MatchRule::Tokens { literals, .. } => literals.to_vec(),
        }
    }
}

fn literals_match(literals: &[&str], phrases: &[String]) -> bool {
    literals.len() <= phrases.len()
        && literals
            .iter()
            .zip(phrases)
            .all(|(literal, phrase)| phrase.eq_ignore_ascii_case(literal))
}

/// One registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub rule: MatchRule,
    /// Usage line shown by `help`
    pub usage: &'static str,
}

const fn line(kind: CommandKind, text: &'static str) -> CommandSpec {
    CommandSpec {
        kind,
        rule: MatchRule::Line(text),
        usage: text,
    }
}

const fn tokens(
    kind: CommandKind,
    literals: &'static [&'static str],
    min: usize,
    max: Option<usize>,
    usage: &'static str,
) -> CommandSpec {
    CommandSpec {
        kind,
        rule: MatchRule::Tokens { literals, min, max },
        usage,
    }
}

const STANDARD_COMMANDS: &[CommandSpec] = &[
    line(CommandKind::Quit, "quit"),
    line(CommandKind::Debug, "debug"),
    line(CommandKind::DebugOn, "debug on"),
    line(CommandKind::DebugOff, "debug off"),
    line(CommandKind::CloseDatabase, "close database"),
    line(CommandKind::CheckDatabase, "check database"),
    line(CommandKind::ListTables, "list tables"),
    line(CommandKind::ListSchemas, "list schemas"),
    line(CommandKind::SelectConnection, "select connection"),
    line(CommandKind::CountTables, "count tables"),
    line(CommandKind::Connections, "connections"),
    line(CommandKind::Now, "time"),
    line(CommandKind::DbInfo, "dbinfo"),
    line(CommandKind::Version, "version"),
    tokens(CommandKind::Help, &["help"], 1, Some(2), "help [<start of a command>]"),
    tokens(CommandKind::Connect, &["connect"], 1, None, "connect <URL> [<user> [<pw>]]"),
    tokens(CommandKind::SelectSchema, &["select", "schema"], 3, Some(3), "select schema <schema name>"),
    tokens(CommandKind::DescribeTable, &["describe", "table"], 3, Some(3), "describe table <table name>"),
    tokens(CommandKind::CountRows, &["count", "rows"], 3, Some(3), "count rows <table>"),
    tokens(
        CommandKind::ExportData,
        &["export", "data"],
        3,
        None,
        "export data <table name> [<where-clause>]",
    ),
    tokens(CommandKind::ExportSchema, &["export", "schema"], 3, Some(3), "export schema <filename>"),
    tokens(CommandKind::Time, &["time"], 2, None, "time <command>"),
];

/// Ordered command table.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    lines: Vec<CommandSpec>,
    patterns: Vec<CommandSpec>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(STANDARD_COMMANDS.iter().copied())
    }
}

impl CommandRegistry {
    /// Builds a registry, ordering token patterns from most to least specific.
    pub fn new(specs: impl IntoIterator<Item = CommandSpec>) -> Self {
        let (lines, mut patterns): (Vec<_>, Vec<_>) = specs
            .into_iter()
            .partition(|spec| matches!(spec.rule, MatchRule::Line(_)));

        // Stable sort keeps declaration order among equals
        patterns.sort_by_key(|spec| {
            let (min, _) = spec.rule.arity();
            (Reverse(spec.rule.literals().len()), Reverse(min))
        });

        Self { lines, patterns }
    }

    /// Resolves parsed phrases to a command.
    pub fn resolve(&self, phrases: &[String]) -> Option<CommandKind> {
        if phrases.is_empty() {
            return None;
        }

        self.lines
            .iter()
            .chain(&self.patterns)
            .find(|spec| spec.rule.matches(phrases))
            .map(|spec| spec.kind)
    }

    /// Usage lines starting with `prefix`, sorted.
    pub fn usages(&self, prefix: Option<&str>) -> Vec<&'static str> {
        let mut usages: Vec<&'static str> = self
            .lines
            .iter()
            .chain(&self.patterns)
            .map(|spec| spec.usage)
            .filter(|usage| prefix.is_none_or(|prefix| usage.starts_with(prefix)))
            .collect();
        usages.sort_unstable();
        usages
    }

    /// Pairs of entries that could both accept some line.
    pub fn overlaps(&self) -> Vec<(CommandKind, CommandKind)> {
        let all: Vec<&CommandSpec> = self.lines.iter().chain(&self.patterns).collect();
        let mut found = Vec::new();

        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                if rules_overlap(&a.rule, &b.rule) {
                    found.push((a.kind, b.kind));
                }
            }
        }

        found
    }
}

fn rules_overlap(a: &MatchRule, b: &MatchRule) -> bool {
    let (a_literals, b_literals) = (a.literals(), b.literals());
    let shared = a_literals.len().min(b_literals.len());
    if !a_literals[..shared]
        .iter()
        .zip(&b_literals[..shared])
        .all(|(x, y)| x.eq_ignore_ascii_case(y))
    {
        return false;
    }

    // Some phrase count must satisfy both arities and cover both prefixes
    let (a_min, a_max) = a.arity();
    let (b_min, b_max) = b.arity();
    let low = a_min.max(b_min).max(a_literals.len()).max(b_literals.len());
    let high = match (a_max, b_max) {
        (Some(x), Some(y)) => x.min(y),
        (Some(x), None) | (None, Some(x)) => x,
        (None, None) => usize::MAX,
    };

    low <= high
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::parser::parse_phrases;

    fn resolve(line: &str) -> Option<CommandKind> {
        CommandRegistry::default().resolve(&parse_phrases(line))
    }

    #[test]
    fn test_line_commands() {
        let test_cases = [
            ("quit", CommandKind::Quit),
            ("  QUIT ", CommandKind::Quit),
            ("debug", CommandKind::Debug),
            ("debug   on", CommandKind::DebugOn),
            ("debug off", CommandKind::DebugOff),
            ("list tables", CommandKind::ListTables),
            ("list schemas", CommandKind::ListSchemas),
            ("select connection", CommandKind::SelectConnection),
            ("close database", CommandKind::CloseDatabase),
            ("check database", CommandKind::CheckDatabase),
            ("count tables", CommandKind::CountTables),
            ("connections", CommandKind::Connections),
            ("time", CommandKind::Now),
            ("dbinfo", CommandKind::DbInfo),
            ("version", CommandKind::Version),
        ];

        for (line, expected) in test_cases {
            assert_eq!(resolve(line), Some(expected), "Failed for '{}'", line);
        }
    }

    #[test]
    fn test_token_commands() {
        let test_cases = [
            ("help", CommandKind::Help),
            ("help ex", CommandKind::Help),
            ("connect", CommandKind::Connect),
            ("connect sqlite::memory: a b", CommandKind::Connect),
            ("select schema sales", CommandKind::SelectSchema),
            ("describe table orders", CommandKind::DescribeTable),
            ("count rows orders", CommandKind::CountRows),
            ("export schema out.xml", CommandKind::ExportSchema),
            ("time list tables", CommandKind::Time),
        ];

        for (line, expected) in test_cases {
            assert_eq!(resolve(line), Some(expected), "Failed for '{}'", line);
        }
    }

    #[test]
    fn test_export_data_with_and_without_clause() {
        assert_eq!(resolve("export data orders"), Some(CommandKind::ExportData));
        assert_eq!(resolve("export data orders where x=1"), Some(CommandKind::ExportData));
        assert_eq!(resolve("export data orders \"where x = 1\""), Some(CommandKind::ExportData));
    }

    #[test]
    fn test_unknown_lines() {
        for line in [
            "",
            "list",
            "list tables now",
            "debug maybe",
            "describe table",
            "describe table a b",
            "export schema",
            "export schema a b",
            "help a b",
            "select schema",
            "frobnicate",
        ] {
            assert_eq!(resolve(line), None, "Expected no match for '{}'", line);
        }
    }

    #[test]
    fn test_specific_patterns_come_first() {
        let registry = CommandRegistry::new([
            tokens(CommandKind::Help, &["export"], 2, None, "export <x>"),
            tokens(CommandKind::ExportSchema, &["export", "schema"], 3, Some(3), "export schema <f>"),
        ]);

        let phrases = parse_phrases("export schema out.xml");
        assert_eq!(registry.resolve(&phrases), Some(CommandKind::ExportSchema));
        assert_eq!(registry.overlaps(), vec![(CommandKind::ExportSchema, CommandKind::Help)]);
    }

    #[test]
    fn test_standard_registry_has_no_overlaps() {
        assert!(CommandRegistry::default().overlaps().is_empty());
    }

    #[test]
    fn test_usages() {
        let registry = CommandRegistry::default();
        let usages = registry.usages(None);
        assert_eq!(usages.len(), STANDARD_COMMANDS.len());
        assert!(usages.windows(2).all(|pair| pair[0] <= pair[1]));

        assert_eq!(registry.usages(Some("debug")), ["debug", "debug off", "debug on"]);
        assert!(registry.usages(Some("zzz")).is_empty());
    }
}
