//! Language pattern registry.
//!
//! Every language-dependent check asks the registry for the heuristic it
//! needs. A lookup either yields the pattern or reports the language as
//! unsupported; callers must handle both cases, and unsupported languages
//! always degrade to a skipped (passing) result.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// Primary language of the project under validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    Dart,
    /// Any language without a pattern table. Holds the name as configured.
    Unsupported(String),
}

/// Result of a registry lookup.
#[derive(Debug, Clone, Copy)]
pub enum Support<T> {
    Supported(T),
    Unsupported,
}

/// Naming rules for one language.
///
/// Only `file` is enforced; the class and function rules are kept with the
/// table but nothing inside files is checked against them.
#[derive(Debug)]
pub struct NamingConvention {
    pub file: Regex,
    pub class: Regex,
    pub function: Regex,
}

/// A call considered unsafe, such as dynamic evaluation.
#[derive(Debug)]
pub struct UnsafeFunction {
    pub name: &'static str,
    pub call: Regex,
}

/// Pattern that extracts defined function names from file content.
#[derive(Debug)]
pub struct DefinitionPattern {
    regex: &'static Regex,
    /// Leading words that make a match a statement rather than a definition.
    excluded_leads: &'static [&'static str],
}

impl DefinitionPattern {
    /// All function names defined in `content`, in order of appearance.
    pub fn names<'t>(&self, content: &'t str) -> Vec<&'t str> {
        self.regex
            .captures_iter(content)
            .filter(|caps| {
                caps.name("lead")
                    .map(|lead| !self.excluded_leads.contains(&lead.as_str()))
                    .unwrap_or(true)
            })
            .filter_map(|caps| caps.name("name").or_else(|| caps.name("alt")))
            .map(|m| m.as_str())
            .collect()
    }
}

const DART_STATEMENT_LEADS: &[&str] = &[
    "return", "new", "await", "throw", "else", "if", "for", "while", "switch", "case", "catch",
];

lazy_static! {
    static ref PY_FUNCTION_HEADER: Regex = Regex::new(r"^\s*def\s+\w+").unwrap();
    static ref JS_FUNCTION_HEADER: Regex =
        Regex::new(r"^\s*(function\s+\w+|const\s+\w+\s*=\s*\()").unwrap();
    // Also matches statements such as `return helper(x);` or `else if (`.
    // A nested match replaces the open function, so a body containing one
    // is never measured as a whole.
    static ref DART_FUNCTION_HEADER: Regex = Regex::new(r"^\s*\w+\s+\w+\s*\(").unwrap();

    static ref PY_IMPORT: Regex = Regex::new(r"^(import\s+\S+|from\s+\S+\s+import)").unwrap();
    static ref JS_IMPORT: Regex =
        Regex::new(r"^(import\s+.*from|const\s+.*=\s*require)").unwrap();
    static ref DART_IMPORT: Regex = Regex::new(r"^import\s+").unwrap();

    static ref JS_IMPORT_LINE: Regex =
        Regex::new(r#"^import\s+.*from\s+["']([^"']+)["']"#).unwrap();
    static ref DART_IMPORT_LINE: Regex = Regex::new(r#"^import\s+["']([^"']+)["']"#).unwrap();

    static ref PY_DEFINITION: Regex = Regex::new(r"def\s+(?P<name>\w+)\s*\(").unwrap();
    static ref JS_DEFINITION: Regex =
        Regex::new(r"function\s+(?P<name>\w+)\s*\(|const\s+(?P<alt>\w+)\s*=\s*\(").unwrap();
    static ref DART_DEFINITION: Regex =
        Regex::new(r"(?m)^[ \t]*(?P<lead>\w+)[ \t]+(?P<name>\w+)\s*\(").unwrap();

    static ref PY_NAMING: NamingConvention = NamingConvention {
        file: Regex::new(r"^[a-z_]+\.py$").unwrap(),
        class: Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap(),
        function: Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap(),
    };
    static ref JS_NAMING: NamingConvention = NamingConvention {
        file: Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*\.(js|ts)$").unwrap(),
        class: Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap(),
        function: Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap(),
    };
    static ref DART_NAMING: NamingConvention = NamingConvention {
        file: Regex::new(r"^[a-z_]+\.dart$").unwrap(),
        class: Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap(),
        function: Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap(),
    };

    static ref PY_UNSAFE: Vec<UnsafeFunction> = vec![
        UnsafeFunction { name: "eval", call: Regex::new(r"\beval\s*\(").unwrap() },
        UnsafeFunction { name: "exec", call: Regex::new(r"\bexec\s*\(").unwrap() },
        UnsafeFunction { name: "compile", call: Regex::new(r"\bcompile\s*\(").unwrap() },
        UnsafeFunction { name: "__import__", call: Regex::new(r"\b__import__\s*\(").unwrap() },
    ];
    static ref JS_UNSAFE: Vec<UnsafeFunction> = vec![
        UnsafeFunction { name: "eval", call: Regex::new(r"\beval\s*\(").unwrap() },
        UnsafeFunction { name: "Function", call: Regex::new(r"\bFunction\s*\(").unwrap() },
        // Only the string-argument form compiles code at runtime.
        UnsafeFunction {
            name: "setTimeout",
            call: Regex::new(r#"\bsetTimeout\s*\(\s*["'`]"#).unwrap(),
        },
        UnsafeFunction {
            name: "setInterval",
            call: Regex::new(r#"\bsetInterval\s*\(\s*["'`]"#).unwrap(),
        },
    ];

    static ref PY_DEFINITIONS: DefinitionPattern = DefinitionPattern {
        regex: &*PY_DEFINITION,
        excluded_leads: &[],
    };
    static ref JS_DEFINITIONS: DefinitionPattern = DefinitionPattern {
        regex: &*JS_DEFINITION,
        excluded_leads: &[],
    };
    static ref DART_DEFINITIONS: DefinitionPattern = DefinitionPattern {
        regex: &*DART_DEFINITION,
        excluded_leads: DART_STATEMENT_LEADS,
    };
}

impl Language {
    /// Parse a language identifier. Unknown names become [`Language::Unsupported`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "python" | "py" => Language::Python,
            "javascript" | "js" | "typescript" | "ts" => Language::JavaScript,
            "dart" => Language::Dart,
            other => Language::Unsupported(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Dart => "dart",
            Language::Unsupported(name) => name,
        }
    }

    /// Line pattern that opens a function, used for function length.
    pub fn function_header(&self) -> Support<&'static Regex> {
        match self {
            Language::Python => Support::Supported(&*PY_FUNCTION_HEADER),
            Language::JavaScript => Support::Supported(&*JS_FUNCTION_HEADER),
            Language::Dart => Support::Supported(&*DART_FUNCTION_HEADER),
            Language::Unsupported(_) => Support::Unsupported,
        }
    }

    /// Line pattern for import statements.
    pub fn import_statement(&self) -> Support<&'static Regex> {
        match self {
            Language::Python => Support::Supported(&*PY_IMPORT),
            Language::JavaScript => Support::Supported(&*JS_IMPORT),
            Language::Dart => Support::Supported(&*DART_IMPORT),
            Language::Unsupported(_) => Support::Unsupported,
        }
    }

    pub fn naming_convention(&self) -> Support<&'static NamingConvention> {
        match self {
            Language::Python => Support::Supported(&*PY_NAMING),
            Language::JavaScript => Support::Supported(&*JS_NAMING),
            Language::Dart => Support::Supported(&*DART_NAMING),
            Language::Unsupported(_) => Support::Unsupported,
        }
    }

    /// Deny-list of unsafe calls. Dart has none.
    pub fn unsafe_functions(&self) -> Support<&'static [UnsafeFunction]> {
        match self {
            Language::Python => Support::Supported(PY_UNSAFE.as_slice()),
            Language::JavaScript => Support::Supported(JS_UNSAFE.as_slice()),
            Language::Dart | Language::Unsupported(_) => Support::Unsupported,
        }
    }

    /// Name-capturing pattern for function definitions.
    pub fn function_definition(&self) -> Support<&'static DefinitionPattern> {
        match self {
            Language::Python => Support::Supported(&*PY_DEFINITIONS),
            Language::JavaScript => Support::Supported(&*JS_DEFINITIONS),
            Language::Dart => Support::Supported(&*DART_DEFINITIONS),
            Language::Unsupported(_) => Support::Unsupported,
        }
    }

    /// Import pattern used for positional duplicate detection.
    pub fn import_line(&self) -> Support<&'static Regex> {
        match self {
            Language::Python => Support::Supported(&*PY_IMPORT),
            Language::JavaScript => Support::Supported(&*JS_IMPORT_LINE),
            Language::Dart => Support::Supported(&*DART_IMPORT_LINE),
            Language::Unsupported(_) => Support::Unsupported,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported<T>(support: Support<T>) -> T {
        match support {
            Support::Supported(value) => value,
            Support::Unsupported => panic!("expected a supported lookup"),
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(Language::parse("Python"), Language::Python);
        assert_eq!(Language::parse("ts"), Language::JavaScript);
        assert_eq!(Language::parse("dart"), Language::Dart);
        assert_eq!(Language::parse("Go"), Language::Unsupported("go".to_string()));
        assert_eq!(Language::parse("go").to_string(), "go");
    }

    #[test]
    fn test_unsupported_language_has_no_patterns() {
        let lang = Language::Unsupported("go".to_string());
        assert!(matches!(lang.function_header(), Support::Unsupported));
        assert!(matches!(lang.import_statement(), Support::Unsupported));
        assert!(matches!(lang.naming_convention(), Support::Unsupported));
        assert!(matches!(lang.unsafe_functions(), Support::Unsupported));
        assert!(matches!(lang.function_definition(), Support::Unsupported));
        assert!(matches!(lang.import_line(), Support::Unsupported));
    }

    #[test]
    fn test_dart_has_no_unsafe_list() {
        assert!(matches!(Language::Dart.unsafe_functions(), Support::Unsupported));
        assert!(matches!(Language::Dart.function_header(), Support::Supported(_)));
    }

    #[test]
    fn test_function_headers() {
        let py = supported(Language::Python.function_header());
        assert!(py.is_match("    def handler(self):"));
        assert!(!py.is_match("x = define(1)"));

        let js = supported(Language::JavaScript.function_header());
        assert!(js.is_match("function load() {"));
        assert!(js.is_match("const load = () => {"));
        assert!(!js.is_match("let value = 3;"));
    }

    #[test]
    fn test_definition_names() {
        let js = supported(Language::JavaScript.function_definition());
        let names = js.names("function foo() {}\nconst bar = (x) => x;\n");
        assert_eq!(names, vec!["foo", "bar"]);

        let dart = supported(Language::Dart.function_definition());
        let names = dart.names("void main() {\n  return compute(1);\n}\nint compute(int x) {\n}\n");
        assert_eq!(names, vec!["main", "compute"]);
    }

    #[test]
    fn test_naming_convention_tables() {
        let py = supported(Language::Python.naming_convention());
        assert!(py.file.is_match("data_loader.py"));
        assert!(!py.file.is_match("DataLoader.py"));
        assert!(py.class.is_match("DataLoader"));
        assert!(py.function.is_match("load_data"));
    }

    #[test]
    fn test_unsafe_set_timeout_requires_string() {
        let js = supported(Language::JavaScript.unsafe_functions());
        let timeout = js.iter().find(|f| f.name == "setTimeout").unwrap();
        assert!(timeout.call.is_match(r#"setTimeout("tick()", 10)"#));
        assert!(!timeout.call.is_match("setTimeout(tick, 10)"));
    }
}
