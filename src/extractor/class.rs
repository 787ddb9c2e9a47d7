use super::function::extract_parameters;
use super::inline::InlineDocs;
use crate::model::Parameter;
use crate::parser::{node_text, single_line_text};
use log::debug;
use tree_sitter::Node;

/// Annotated attributes declared directly in a class body.
///
/// Only `name: Type` and `name: Type = value` statements count; plain assignments and
/// anything nested in methods are ignored.
pub fn extract_attributes(class: Node<'_>, source: &str, docs: &InlineDocs<'_>) -> Vec<Parameter> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut cursor = body.walk();
    let statements: Vec<_> = body.named_children(&mut cursor).collect();
    statements
        .into_iter()
        .filter_map(|stmt| annotated_attribute(stmt, source, docs))
        .collect()
}

/// The `assignment` node of a `name: Type [= value]` statement.
pub fn attribute_assignment(stmt: Node<'_>) -> Option<Node<'_>> {
    if stmt.kind() != "expression_statement" {
        return None;
    }
    let assignment = stmt.named_child(0).filter(|n| n.kind() == "assignment")?;
    assignment.child_by_field_name("type")?;
    assignment
        .child_by_field_name("left")
        .filter(|n| n.kind() == "identifier")?;
    Some(assignment)
}

fn annotated_attribute(stmt: Node<'_>, source: &str, docs: &InlineDocs<'_>) -> Option<Parameter> {
    let assignment = attribute_assignment(stmt)?;
    let annotation = assignment.child_by_field_name("type")?;
    let target = assignment.child_by_field_name("left")?;

    let name = node_text(target, source);
    let mut attribute =
        Parameter::new(name).with_annotation(single_line_text(annotation, source));
    if let Some(value) = assignment.child_by_field_name("right") {
        attribute.default_value = Some(single_line_text(value, source));
    }
    attribute.inline_doc = docs.lookup(assignment.start_position().row + 1, name);
    Some(attribute)
}

/// The `__init__` method defined in a class body, if any.
pub fn find_initializer<'t>(class: Node<'t>, source: &str) -> Option<Node<'t>> {
    let body = class.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let init = body.named_children(&mut cursor).find_map(|stmt| {
        let function = match stmt.kind() {
            "function_definition" => stmt,
            "decorated_definition" => stmt.child_by_field_name("definition")?,
            _ => return None,
        };
        let name = function.child_by_field_name("name")?;
        (function.kind() == "function_definition" && node_text(name, source) == "__init__")
            .then_some(function)
    });
    init
}

/// Constructor parameters, or `None` when the class has no `__init__`.
pub fn extract_init_params(
    class: Node<'_>,
    source: &str,
    docs: &InlineDocs<'_>,
) -> Option<Vec<Parameter>> {
    let init = find_initializer(class, source)?;
    let params = extract_parameters(init, source, docs, true);
    debug!("__init__ has {} parameters", params.len());
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::NotebookParser;

    const SOURCE: &str = r#"class Config:
    """Settings."""

    name: str  # display name
    retries: int = 3
    cache = {}

    def __init__(self, path: str,  # where to read
                 strict=False):
        self.path = path
        self.scratch: int = 0

    def reload(self):
        pass
"#;

    #[test]
    fn test_class_attributes() {
        let tree = NotebookParser::parse_source(SOURCE).unwrap();
        let class = tree.root_node().named_child(0).unwrap();
        let docs = InlineDocs::new(SOURCE);

        let attrs = extract_attributes(class, SOURCE, &docs);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "name");
        assert_eq!(attrs[0].type_annotation.as_deref(), Some("str"));
        assert_eq!(attrs[0].inline_doc, "display name");
        assert_eq!(attrs[1].name, "retries");
        assert_eq!(attrs[1].default_value.as_deref(), Some("3"));
        assert_eq!(attrs[1].inline_doc, "");
    }

    #[test]
    fn test_init_params_kept_separate() {
        let tree = NotebookParser::parse_source(SOURCE).unwrap();
        let class = tree.root_node().named_child(0).unwrap();
        let docs = InlineDocs::new(SOURCE);

        let init = extract_init_params(class, SOURCE, &docs).unwrap();
        let names: Vec<_> = init.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["path", "strict"]);
        assert_eq!(init[0].inline_doc, "where to read");
        assert_eq!(init[1].default_value.as_deref(), Some("False"));
    }

    #[test]
    fn test_class_without_init() {
        let source = "class Empty:\n    x: int\n";
        let tree = NotebookParser::parse_source(source).unwrap();
        let class = tree.root_node().named_child(0).unwrap();
        let docs = InlineDocs::new(source);
        assert!(extract_init_params(class, source, &docs).is_none());
    }

    #[test]
    fn test_attribute_annotation_on_one_line() {
        let source = "class Grid:\n    cells: dict[\n        str,  # row key\n        int,\n    ] = {}  # lookup\n";
        let tree = NotebookParser::parse_source(source).unwrap();
        let class = tree.root_node().named_child(0).unwrap();
        let docs = InlineDocs::new(source);

        let attrs = extract_attributes(class, source, &docs);
        assert_eq!(attrs[0].type_annotation.as_deref(), Some("dict[str, int,]"));
        assert_eq!(attrs[0].default_value.as_deref(), Some("{}"));
    }
}
