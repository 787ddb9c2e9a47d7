use super::inline::InlineDocs;
use crate::classifier::{first_child_of_kind, is_static_literal};
use crate::model::{Parameter, ReturnInfo};
use crate::parser::{node_text, single_line_text};
use log::debug;
use tree_sitter::Node;

/// Receiver names dropped from the front of a plain function's parameter list
const RECEIVERS: [&str; 2] = ["self", "cls"];

/// Extracts the parameter list of a `function_definition`.
///
/// Parameters come back in source order with `*args` / `**kwargs` flagged. The receiver is
/// dropped: always for methods, and for plain functions when it is spelled `self` or `cls`.
pub fn extract_parameters(
    function: Node<'_>,
    source: &str,
    docs: &InlineDocs<'_>,
    is_method: bool,
) -> Vec<Parameter> {
    let Some(parameters) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut params: Vec<Parameter> = Vec::new();
    let mut keyword_only = false;
    let mut cursor = parameters.walk();

    for node in parameters.named_children(&mut cursor) {
        let line = node.start_position().row + 1;
        let param = match node.kind() {
            "identifier" => Some(Parameter::new(node_text(node, source))),
            "typed_parameter" => typed_parameter(node, source),
            "default_parameter" | "typed_default_parameter" => {
                node.child_by_field_name("name").map(|name| {
                    let mut param = Parameter::new(node_text(name, source));
                    param.type_annotation = field_text(node, "type", source);
                    param.default_value = field_text(node, "value", source);
                    param
                })
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => splat(node, source),
            "keyword_separator" => {
                keyword_only = true;
                None
            }
            "positional_separator" => {
                params
                    .iter_mut()
                    .for_each(|param| param.is_positional_only = true);
                None
            }
            _ => None,
        };

        let Some(mut param) = param else {
            continue;
        };
        if param.is_variadic_positional {
            keyword_only = true;
        } else if keyword_only && !param.is_variadic_keyword {
            param.is_keyword_only = true;
        }
        param.inline_doc = docs.lookup(line, &param.name);
        params.push(param);
    }

    let drop_receiver = params.first().is_some_and(|first| {
        !first.is_variadic() && (is_method || RECEIVERS.contains(&first.name.as_str()))
    });
    if drop_receiver {
        let receiver = params.remove(0);
        debug!("Dropped receiver parameter {}", receiver.name);
    }

    params
}

/// Name of the receiver parameter of a method, if it has one.
pub fn receiver_name(function: Node<'_>, source: &str) -> Option<String> {
    let parameters = function.child_by_field_name("parameters")?;
    let mut cursor = parameters.walk();
    let first = parameters
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;
    match first.kind() {
        "identifier" => Some(node_text(first, source).to_string()),
        "typed_parameter" => first
            .named_child(0)
            .filter(|n| n.kind() == "identifier")
            .map(|n| node_text(n, source).to_string()),
        "default_parameter" | "typed_default_parameter" => {
            field_text(first, "name", source)
        }
        _ => None,
    }
}

/// Return annotation and the inline comment on the `->` line.
///
/// Literal annotations such as `None` or `"Foo"` are ignored; the comment still counts.
pub fn extract_return(
    function: Node<'_>,
    source: &str,
    docs: &InlineDocs<'_>,
) -> Option<ReturnInfo> {
    let arrow = first_child_of_kind(function, "->")?;
    let doc = docs.lookup_return(arrow.start_position().row + 1);

    let annotation = function.child_by_field_name("return_type").and_then(|ty| {
        let expr = ty.named_child(0).unwrap_or(ty);
        if is_static_literal(expr, source) {
            None
        } else {
            Some(single_line_text(ty, source))
        }
    });

    if annotation.is_none() && doc.is_empty() {
        return None;
    }
    Some(ReturnInfo { annotation, doc })
}

fn typed_parameter(node: Node<'_>, source: &str) -> Option<Parameter> {
    let target = node.named_child(0)?;
    let mut param = match target.kind() {
        "identifier" => Parameter::new(node_text(target, source)),
        "list_splat_pattern" | "dictionary_splat_pattern" => splat(target, source)?,
        _ => return None,
    };
    param.type_annotation = field_text(node, "type", source);
    Some(param)
}

fn splat(node: Node<'_>, source: &str) -> Option<Parameter> {
    let name = node.named_child(0).filter(|n| n.kind() == "identifier")?;
    let mut param = Parameter::new(node_text(name, source));
    if node.kind() == "list_splat_pattern" {
        param.is_variadic_positional = true;
    } else {
        param.is_variadic_keyword = true;
    }
    Some(param)
}

/// Field text flattened onto one line, so it can sit in a rebuilt signature.
fn field_text(node: Node<'_>, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| single_line_text(n, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::NotebookParser;
    use tree_sitter::Tree;

    fn parse(source: &str) -> Tree {
        NotebookParser::parse_source(source).unwrap()
    }

    fn first_function(tree: &Tree) -> Node<'_> {
        let node = tree.root_node().named_child(0).unwrap();
        if node.kind() == "decorated_definition" {
            node.child_by_field_name("definition").unwrap()
        } else {
            node
        }
    }

    #[test]
    fn test_parameters_with_inline_docs() {
        let source = "def add(a: int,  # first\n        b=0,  # second\n        ) -> int:  # sum\n    return a + b\n";
        let tree = parse(source);
        let docs = InlineDocs::new(source);
        let params = extract_parameters(first_function(&tree), source, &docs, false);

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "a");
        assert_eq!(params[0].type_annotation.as_deref(), Some("int"));
        assert_eq!(params[0].default_value, None);
        assert_eq!(params[0].inline_doc, "first");
        assert_eq!(params[1].name, "b");
        assert_eq!(params[1].type_annotation, None);
        assert_eq!(params[1].default_value.as_deref(), Some("0"));
        assert_eq!(params[1].inline_doc, "second");

        let ret = extract_return(first_function(&tree), source, &docs).unwrap();
        assert_eq!(ret.annotation.as_deref(), Some("int"));
        assert_eq!(ret.doc, "sum");
    }

    #[test]
    fn test_variadics_and_separators() {
        let source = "def f(a, /, b, *args: int, c=1, **kwargs):\n    pass\n";
        let tree = parse(source);
        let docs = InlineDocs::new(source);
        let params = extract_parameters(first_function(&tree), source, &docs, false);

        let names: Vec<_> = params.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["a", "b", "*args", "c", "**kwargs"]);
        assert!(params[0].is_positional_only);
        assert!(!params[1].is_positional_only);
        assert_eq!(params[2].type_annotation.as_deref(), Some("int"));
        assert!(params[3].is_keyword_only);
        assert!(params[4].is_variadic_keyword);
        assert!(!params[4].is_keyword_only);
    }

    #[test]
    fn test_bare_star_marks_keyword_only() {
        let source = "def f(a, *, b: str = 'x'):\n    pass\n";
        let tree = parse(source);
        let docs = InlineDocs::new(source);
        let params = extract_parameters(first_function(&tree), source, &docs, false);

        assert_eq!(params.len(), 2);
        assert!(!params[0].is_keyword_only);
        assert!(params[1].is_keyword_only);
        assert_eq!(params[1].default_value.as_deref(), Some("'x'"));
    }

    #[test]
    fn test_receiver_excluded() {
        let source = "def __init__(this, x):\n    pass\n";
        let tree = parse(source);
        let docs = InlineDocs::new(source);
        let function = first_function(&tree);

        let as_method = extract_parameters(function, source, &docs, true);
        assert_eq!(as_method.len(), 1);
        assert_eq!(as_method[0].name, "x");
        assert_eq!(receiver_name(function, source).as_deref(), Some("this"));

        let as_function = extract_parameters(function, source, &docs, false);
        assert_eq!(as_function.len(), 2);
    }

    #[test]
    fn test_return_info_rules() {
        let cases = [
            ("def f():\n    pass\n", None),
            ("def f() -> None:\n    pass\n", None),
            ("def f() -> None:  # nothing\n    pass\n", Some((None, "nothing"))),
            ("def f() -> list[int]:\n    pass\n", Some((Some("list[int]"), ""))),
        ];
        for (source, expected) in cases {
            let tree = parse(source);
            let docs = InlineDocs::new(source);
            let ret = extract_return(first_function(&tree), source, &docs);
            let actual = ret
                .as_ref()
                .map(|r| (r.annotation.as_deref(), r.doc.as_str()));
            assert_eq!(actual, expected, "{}", source);
        }
    }

    #[test]
    fn test_multiline_default_is_flattened() {
        let source = "def f(x=[\n    1,  # one\n    2,\n], y: dict[\n    str, int\n] = {}):\n    pass\n";
        let tree = parse(source);
        let docs = InlineDocs::new(source);
        let params = extract_parameters(first_function(&tree), source, &docs, false);

        assert_eq!(params[0].default_value.as_deref(), Some("[1, 2,]"));
        assert_eq!(params[1].type_annotation.as_deref(), Some("dict[str, int]"));
        assert_eq!(params[1].default_value.as_deref(), Some("{}"));
    }
}
