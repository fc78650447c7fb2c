//! Integration tests for the transaction-scoped relation type registry
//!
//! Loads tests/fixtures/social_schema.yaml and resolves relation types the
//! way an owning transaction does: lookups through a SchemaTx, schema edits
//! on the graph, then an explicit cache reset.

#[cfg(test)]
mod schema_tx_integration_tests {
    use std::io::Write;
    use std::rc::Rc;

    use anyhow::Result;
    use typegraph::config::ResolverConfig;
    use typegraph::type_catalog::{
        ConsistencyModifier, EdgeCategory, Multiplicity, Order, RelationDefinition, SchemaError,
        SchemaGraph, SchemaGraphConfig, SchemaId, SchemaTx, SchemaVertex,
    };

    const FOLLOWS: SchemaId = SchemaId(1);
    const FOLLOWS_BY_SINCE: SchemaId = SchemaId(2);
    const FOLLOWS_BY_WEIGHT: SchemaId = SchemaId(3);
    const NAME: SchemaId = SchemaId(4);
    const SINCE: SchemaId = SchemaId(5);
    const WEIGHT: SchemaId = SchemaId(6);
    const AGE: SchemaId = SchemaId(7);
    const BY_NAME: SchemaId = SchemaId(10);
    const BY_NAME_AGE: SchemaId = SchemaId(11);

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn social_schema() -> Result<SchemaGraph> {
        init_logger();
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/social_schema.yaml");
        Ok(SchemaGraphConfig::from_yaml_file(path)?.to_schema_graph()?)
    }

    #[test]
    fn test_definitions_from_fixture() -> Result<()> {
        let graph = social_schema()?;
        let tx = SchemaTx::with_defaults();

        let follows = tx.relation_type(&graph, FOLLOWS)?;
        assert!(follows.is_edge_label());
        assert_eq!(follows.sort_key(), &[SINCE]);
        assert_eq!(follows.sort_order(), Order::Desc);
        assert_eq!(follows.signature(), &[WEIGHT]);
        assert_eq!(follows.multiplicity(), Multiplicity::Multi);
        assert!(!follows.is_invisible());

        let variant = tx.relation_type(&graph, FOLLOWS_BY_WEIGHT)?;
        assert!(variant.is_invisible());
        assert_eq!(variant.sort_order(), Order::Asc);

        // No definition block at all
        let since = tx.relation_type(&graph, SINCE)?;
        assert!(since.is_property_key());
        assert!(since.definition().is_none());
        assert_eq!(since.multiplicity(), Multiplicity::Many2One);
        Ok(())
    }

    #[test]
    fn test_hierarchy_from_fixture() -> Result<()> {
        let graph = social_schema()?;
        let tx = SchemaTx::with_defaults();
        let follows = tx.relation_type(&graph, FOLLOWS)?;

        let ids: Vec<SchemaId> = tx
            .relation_indexes(&graph, &follows)?
            .iter()
            .map(|ty| ty.id())
            .collect();
        assert_eq!(ids, vec![FOLLOWS, FOLLOWS_BY_SINCE, FOLLOWS_BY_WEIGHT]);

        for variant in [FOLLOWS_BY_SINCE, FOLLOWS_BY_WEIGHT] {
            let variant = tx.relation_type(&graph, variant)?;
            let base = tx.base_type(&graph, &variant)?.expect("variant has a base type");
            assert!(Rc::ptr_eq(&base, &follows));
        }
        Ok(())
    }

    #[test]
    fn test_policy_inherited_by_variants() -> Result<()> {
        let graph = social_schema()?;
        let tx = SchemaTx::with_defaults();

        for id in [FOLLOWS, FOLLOWS_BY_SINCE] {
            let ty = tx.relation_type(&graph, id)?;
            assert_eq!(tx.consistency_modifier(&graph, &ty)?, ConsistencyModifier::Lock);
            assert_eq!(tx.ttl(&graph, &ty)?, 86400);
        }

        // Property keys without modifiers use the configured defaults
        let config = ResolverConfig {
            default_ttl_secs: 600,
            ..Default::default()
        };
        let tx = SchemaTx::new(config);
        let name = tx.relation_type(&graph, NAME)?;
        assert_eq!(tx.ttl(&graph, &name)?, 600);
        assert_eq!(tx.consistency_modifier(&graph, &name)?, ConsistencyModifier::Default);
        Ok(())
    }

    #[test]
    fn test_key_indexes_follow_schema_edits_after_reset() -> Result<()> {
        let mut graph = social_schema()?;
        let tx = SchemaTx::with_defaults();

        let name = tx.relation_type(&graph, NAME)?;
        let indexes = name.key_indexes(&graph)?;
        let ids: Vec<SchemaId> = indexes.iter().map(|index| index.id).collect();
        assert_eq!(ids, vec![BY_NAME, BY_NAME_AGE]);
        assert!(indexes[0].unique);
        assert_eq!(indexes[1].fields, vec![NAME, AGE]);

        // A new index over `age` is committed and becomes visible
        graph.add_vertex(SchemaVertex::composite_index(12u64, "by_age"));
        graph.add_edge(EdgeCategory::IndexField, SchemaId(12), AGE)?;

        let age = tx.relation_type(&graph, AGE)?;
        let stale = age.key_indexes(&graph)?;
        assert_eq!(stale.len(), 2, "age resolved after the edit sees both indexes");

        graph.add_edge(EdgeCategory::IndexField, SchemaId(12), NAME)?;
        assert_eq!(name.key_indexes(&graph)?.len(), 2, "memo holds within the epoch");

        assert!(tx.refresh_if_changed(&graph));
        let name = tx.relation_type(&graph, NAME)?;
        let names: Vec<String> = name
            .key_indexes(&graph)?
            .iter()
            .map(|index| index.name.clone())
            .collect();
        assert_eq!(names, vec!["by_name", "by_name_age", "by_age"]);
        Ok(())
    }

    #[test]
    fn test_handle_held_across_refresh_is_stale() -> Result<()> {
        let mut graph = social_schema()?;
        let tx = SchemaTx::with_defaults();

        let held = tx.relation_type(&graph, NAME)?;
        assert_eq!(held.sort_order(), Order::Asc);
        assert_eq!(held.key_indexes(&graph)?.len(), 2);

        // Definition and index edits land in the same commit
        graph.set_definition(
            NAME,
            Some(
                RelationDefinition {
                    sort_order: Order::Desc,
                    ..Default::default()
                }
                .into(),
            ),
        )?;
        graph.add_vertex(SchemaVertex::composite_index(12u64, "by_name_only"));
        graph.add_edge(EdgeCategory::IndexField, SchemaId(12), NAME)?;
        assert!(tx.refresh_if_changed(&graph));

        assert!(held.is_retired());
        match held.key_indexes(&graph) {
            Err(SchemaError::StaleRelationType { id }) => assert_eq!(id, NAME),
            other => panic!("expected StaleRelationType, got {:?}", other),
        }

        let fresh = tx.relation_type(&graph, NAME)?;
        assert!(!Rc::ptr_eq(&held, &fresh));
        assert_eq!(fresh.sort_order(), Order::Desc);
        assert_eq!(fresh.key_indexes(&graph)?.len(), 3);
        assert_eq!(fresh.epoch(), 0);
        Ok(())
    }

    #[test]
    fn test_multiple_base_types_surface_as_error() -> Result<()> {
        let mut graph = social_schema()?;
        graph.add_edge(EdgeCategory::RelationTypeIndex, FOLLOWS_BY_WEIGHT, FOLLOWS_BY_SINCE)?;
        let tx = SchemaTx::with_defaults();
        let variant = tx.relation_type(&graph, FOLLOWS_BY_SINCE)?;

        match tx.base_type(&graph, &variant) {
            Err(SchemaError::MultipleBaseTypes { id, count }) => {
                assert_eq!(id, FOLLOWS_BY_SINCE);
                assert_eq!(count, 2);
            }
            other => panic!(
                "Expected MultipleBaseTypes, got {:?}",
                other.map(|t| t.map(|t| t.id()))
            ),
        }
        Ok(())
    }

    #[test]
    fn test_resolver_config_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "reset_policy_memo: false")?;
        writeln!(file, "default_ttl_secs: 30")?;

        let config = ResolverConfig::from_yaml_file(file.path())?;
        assert!(!config.reset_policy_memo);
        assert!(config.inherit_base_policy);
        assert_eq!(config.default_ttl_secs, 30);

        let graph = social_schema()?;
        let tx = SchemaTx::new(config);
        let weight = tx.relation_type(&graph, WEIGHT)?;
        assert_eq!(tx.ttl(&graph, &weight)?, 30);
        Ok(())
    }

    #[test]
    fn test_missing_schema_file() {
        let result = SchemaGraphConfig::from_yaml_file("/nonexistent/schema.yaml");
        assert!(matches!(result, Err(SchemaError::ConfigReadError { .. })));
    }
}
