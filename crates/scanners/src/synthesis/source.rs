//! Structured Solidity source builder.
//!
//! Generated files are assembled as a tree (file, contracts, members,
//! statements) and rendered in one pass. Braces and statement terminators
//! are only ever produced by `render`, so every rendered file is balanced
//! no matter which members were added.

use std::collections::HashMap;

const INDENT: &str = "    ";

/// Maps any text onto a valid Solidity identifier: characters outside
/// `[A-Za-z0-9_]` become `_`, and a leading digit gets a `_` prefix.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Hands out identifiers that are unique within one scope; a repeated name
/// gets a numeric suffix (`deposit`, `deposit_2`, ...).
#[derive(Debug, Default)]
pub struct UniqueNames {
    seen: HashMap<String, usize>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, raw: &str) -> String {
        let base = sanitize_identifier(raw);
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{}_{}", base, count)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A simple statement; the renderer appends the `;`.
    Line(String),
    Comment(String),
    /// `header { body }` followed by any number of `tail { body }` clauses,
    /// covering if/else and try/catch.
    Block {
        header: String,
        body: Vec<Statement>,
        tails: Vec<(String, Vec<Statement>)>,
    },
}

impl Statement {
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    pub fn block(header: impl Into<String>, body: Vec<Statement>) -> Self {
        Self::Block {
            header: header.into(),
            body,
            tails: Vec::new(),
        }
    }

    /// Appends a tail clause to a block; other statements are returned unchanged.
    pub fn then(self, header: impl Into<String>, body: Vec<Statement>) -> Self {
        match self {
            Self::Block {
                header: h,
                body: b,
                mut tails,
            } => {
                tails.push((header.into(), body));
                Self::Block {
                    header: h,
                    body: b,
                    tails,
                }
            }
            other => other,
        }
    }

    fn render(&self, depth: usize, out: &mut String) {
        let pad = INDENT.repeat(depth);
        match self {
            Self::Line(text) => {
                out.push_str(&format!("{}{};\n", pad, text.trim_end_matches(';')));
            }
            Self::Comment(text) => render_comment(text, &pad, out),
            Self::Block {
                header,
                body,
                tails,
            } => {
                out.push_str(&format!("{}{} {{\n", pad, header));
                render_statements(body, depth + 1, out);
                for (tail, tail_body) in tails {
                    out.push_str(&format!("{}}} {} {{\n", pad, tail));
                    render_statements(tail_body, depth + 1, out);
                }
                out.push_str(&format!("{}}}\n", pad));
            }
        }
    }
}

fn render_statements(statements: &[Statement], depth: usize, out: &mut String) {
    for statement in statements {
        statement.render(depth, out);
    }
}

fn render_comment(text: &str, pad: &str, out: &mut String) {
    for line in text.lines() {
        if line.is_empty() {
            out.push_str(&format!("{}//\n", pad));
        } else {
            out.push_str(&format!("{}// {}\n", pad, line));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Comment(String),
    /// State variable declaration without the trailing `;`.
    Field(String),
    /// Function, modifier, constructor or receive hook; `signature` is the
    /// full header up to the opening brace.
    Callable {
        signature: String,
        body: Vec<Statement>,
    },
    Blank,
}

impl Member {
    pub fn field(text: impl Into<String>) -> Self {
        Self::Field(text.into())
    }

    pub fn callable(signature: impl Into<String>, body: Vec<Statement>) -> Self {
        Self::Callable {
            signature: signature.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSource {
    pub name: String,
    pub bases: Vec<String>,
    pub doc: Option<String>,
    pub members: Vec<Member>,
}

impl ContractSource {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: sanitize_identifier(name.as_ref()),
            bases: Vec::new(),
            doc: None,
            members: Vec::new(),
        }
    }

    pub fn inherits(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn push(&mut self, member: Member) {
        self.members.push(member);
    }

    fn render(&self, out: &mut String) {
        if let Some(doc) = &self.doc {
            render_comment(doc, "", out);
        }
        if self.bases.is_empty() {
            out.push_str(&format!("contract {} {{\n", self.name));
        } else {
            out.push_str(&format!("contract {} is {} {{\n", self.name, self.bases.join(", ")));
        }

        let mut previous_was_field = false;
        let mut previous_was_comment = false;
        for (index, member) in self.members.iter().enumerate() {
            let is_field = matches!(member, Member::Field(_));
            // A comment sticks to the member below it; `Blank` breaks that.
            if index > 0
                && !(is_field && previous_was_field)
                && !previous_was_comment
                && !matches!(member, Member::Blank)
            {
                out.push('\n');
            }
            match member {
                Member::Comment(text) => render_comment(text, INDENT, out),
                Member::Field(text) => {
                    out.push_str(&format!("{}{};\n", INDENT, text.trim_end_matches(';')))
                }
                Member::Callable { signature, body } => {
                    out.push_str(&format!("{}{} {{\n", INDENT, signature));
                    render_statements(body, 2, out);
                    out.push_str(&format!("{}}}\n", INDENT));
                }
                Member::Blank => {}
            }
            previous_was_field = is_field;
            previous_was_comment = matches!(member, Member::Comment(_));
        }

        out.push_str("}\n");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub license: String,
    pub pragma: String,
    pub imports: Vec<(String, String)>,
    pub contracts: Vec<ContractSource>,
}

impl SourceFile {
    pub fn new(pragma: impl Into<String>) -> Self {
        Self {
            license: "MIT".to_string(),
            pragma: pragma.into(),
            imports: Vec::new(),
            contracts: Vec::new(),
        }
    }

    /// `import {symbol} from "path";`
    pub fn import(mut self, symbol: impl Into<String>, path: impl Into<String>) -> Self {
        self.imports.push((symbol.into(), path.into()));
        self
    }

    pub fn push(&mut self, contract: ContractSource) {
        self.contracts.push(contract);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("// SPDX-License-Identifier: {}\n", self.license));
        out.push_str(&format!("pragma solidity {};\n", self.pragma));

        if !self.imports.is_empty() {
            out.push('\n');
            for (symbol, path) in &self.imports {
                out.push_str(&format!("import {{{}}} from \"{}\";\n", symbol, path));
            }
        }

        for contract in &self.contracts {
            out.push('\n');
            contract.render(&mut out);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("INV-TOKEN-SUPPLY"), "INV_TOKEN_SUPPLY");
        assert_eq!(sanitize_identifier("9lives"), "_9lives");
        assert_eq!(sanitize_identifier(""), "_");
        assert_eq!(sanitize_identifier("ok_name1"), "ok_name1");
    }

    #[test]
    fn test_unique_names() {
        let mut names = UniqueNames::new();
        assert_eq!(names.claim("deposit"), "deposit");
        assert_eq!(names.claim("deposit"), "deposit_2");
        assert_eq!(names.claim("withdraw"), "withdraw");
    }

    #[test]
    fn test_render_is_balanced() {
        let mut contract = ContractSource::new("Demo").inherits("Test");
        contract.push(Member::field("uint256 public x"));
        contract.push(Member::field("uint256 public y;"));
        contract.push(Member::callable(
            "function run(uint256 a) external",
            vec![
                Statement::line("uint256 before = x"),
                Statement::block("try this.run(a)", vec![Statement::line("x += 1")])
                    .then("catch", vec![]),
                Statement::comment("done"),
            ],
        ));

        let mut file = SourceFile::new("^0.8.20").import("Test", "forge-std/Test.sol");
        file.push(contract);
        let rendered = file.render();

        assert_eq!(rendered.matches('{').count(), rendered.matches('}').count());
        assert!(rendered.contains("import {Test} from \"forge-std/Test.sol\";"));
        assert!(rendered.contains("contract Demo is Test {"));
        assert!(rendered.contains("    uint256 public y;\n"));
        assert!(rendered.contains("        try this.run(a) {\n            x += 1;\n        } catch {\n        }\n"));
    }

    #[test]
    fn test_comment_attaches_to_next_member() {
        let mut contract = ContractSource::new("Demo");
        contract.push(Member::callable("function a() public", vec![]));
        contract.push(Member::Comment("about b".to_string()));
        contract.push(Member::callable("function b() public", vec![]));
        contract.push(Member::Comment("skipped c".to_string()));
        contract.push(Member::Blank);
        contract.push(Member::callable("function d() public", vec![]));

        let mut file = SourceFile::new("^0.8.20");
        file.push(contract);
        let rendered = file.render();

        assert!(rendered.contains("    }\n\n    // about b\n    function b() public {\n"));
        assert!(rendered.contains("    // skipped c\n\n    function d() public {\n"));
    }
}
