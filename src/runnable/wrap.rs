//! Turning documented unittest blocks into runnable programs

use regex::Regex;

lazy_static::lazy_static! {
    static ref ASSERT_EQ: Regex = Regex::new(r"assert\((.*)==(.*)\);").expect("valid assert pattern");
}

/// Wrap a unittest body from the page of `module` into a complete program.
///
/// Code that already defines `main` only gets the module import. Anything else
/// becomes the body of a generated `main` with `std.stdio` output functions in
/// scope. A `#line 1` directive keeps compiler messages pointing at the lines
/// the reader sees.
pub fn wrap_into_main(code: &str, module: &str) -> String {
    if code.contains("void main") {
        return format!("import {}; #line 1\n{}", module, code);
    }

    // std.file has its own `write`
    let stdio = if module == "std.file" {
        "import std.stdio: writeln, writef, writefln;"
    } else {
        "import std.stdio: write, writeln, writef, writefln;"
    };

    let mut out = String::from("void main()\n{\n");
    out.push_str(&format!("    import {};\n", module));
    out.push_str(&format!("    {}\n", stdio));
    out.push_str("    #line 1\n    ");
    out.push_str(&code.split('\n').collect::<Vec<_>>().join("\n    "));
    out.push_str("\n}");
    out
}

/// Rewrite `assert(left == right);` into `writeln(left); // right` so an
/// example prints the values it used to check
pub fn assert_to_writeln(code: &str) -> String {
    ASSERT_EQ
        .replace_all(code, |caps: &regex::Captures| {
            format!("writeln({}); // {}", caps[1].trim(), caps[2].trim())
        })
        .into_owned()
}

/// Which modules get runnable examples. The exclusion list is page
/// configuration and is matched literally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnablePolicy {
    ignored_modules: Vec<String>,
}

impl RunnablePolicy {
    pub fn new(ignored_modules: Vec<String>) -> Self {
        Self { ignored_modules }
    }

    pub fn allows(&self, module: &str) -> bool {
        !self.ignored_modules.iter().any(|m| m == module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_plain_unittest_body() {
        let wrapped = wrap_into_main("auto x = [1, 2];\nwriteln(x);", "std.range");
        assert_eq!(
            wrapped,
            "void main()\n{\n    import std.range;\n    import std.stdio: write, writeln, writef, writefln;\n    #line 1\n    auto x = [1, 2];\n    writeln(x);\n}"
        );
    }

    #[test]
    fn test_std_file_omits_write() {
        let wrapped = wrap_into_main("read(\"x\");", "std.file");
        assert!(wrapped.contains("import std.stdio: writeln, writef, writefln;"));
        assert!(!wrapped.contains(" write,"));
    }

    #[test]
    fn test_existing_main_only_gets_import() {
        let code = "void main()\n{\n}";
        assert_eq!(
            wrap_into_main(code, "std.stdio"),
            "import std.stdio; #line 1\nvoid main()\n{\n}"
        );
    }

    #[test]
    fn test_assert_rewrite() {
        let code = "auto r = [1, 2, 3].map!(a => a * 2);\nassert(r.front == 2);\nassert(r.length == 3);";
        assert_eq!(
            assert_to_writeln(code),
            "auto r = [1, 2, 3].map!(a => a * 2);\nwriteln(r.front); // 2\nwriteln(r.length); // 3"
        );
        // non-equality asserts are kept
        assert_eq!(assert_to_writeln("assert(!r.empty);"), "assert(!r.empty);");
    }

    #[test]
    fn test_policy_matches_literally() {
        let policy = RunnablePolicy::new(vec!["std.process".to_string()]);
        assert!(!policy.allows("std.process"));
        assert!(policy.allows("std.process.internal"));
        assert!(RunnablePolicy::default().allows("std.process"));
    }
}
