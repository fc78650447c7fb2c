//! Unit tests for schema graph configuration parsing
//!
//! Tests YAML parsing of vertex and edge definitions without touching the
//! file system.

#[cfg(test)]
mod schema_config_parsing {
    use typegraph::type_catalog::config::{EdgeDefinition, VertexDefinition};
    use typegraph::type_catalog::{EdgeCategory, Multiplicity, SchemaId, SchemaKind};

    #[test]
    fn test_vertex_definition_with_relation_block() {
        let yaml = r#"
id: 5
name: parent_of
kind: edge
definition:
  relation:
    multiplicity: one_to_many
    invisible: true
"#;

        let vertex: VertexDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(vertex.id, SchemaId(5));
        assert_eq!(vertex.kind, SchemaKind::EdgeLabel);

        let relation = vertex.definition.unwrap().relation.unwrap();
        assert_eq!(relation.multiplicity, Multiplicity::One2Many);
        assert!(relation.invisible);
    }

    #[test]
    fn test_vertex_definition_without_definition() {
        let yaml = r#"
id: 6
name: hidden_key
kind: property_key
"#;

        let vertex: VertexDefinition = serde_yaml::from_str(yaml).unwrap();
        assert!(vertex.definition.is_none());
    }

    #[test]
    fn test_definition_block_rejects_unknown_entry() {
        let yaml = r#"
id: 6
name: age
kind: property_key
definition:
  mixed_index: {}
"#;

        assert!(serde_yaml::from_str::<VertexDefinition>(yaml).is_err());
    }

    #[test]
    fn test_edge_category_aliases() {
        let yaml = "{ category: RELATION_TYPE_INDEX, from: 1, to: 2 }";
        let edge: EdgeDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(edge.category, EdgeCategory::RelationTypeIndex);
        assert_eq!((edge.from, edge.to), (SchemaId(1), SchemaId(2)));
    }
}
