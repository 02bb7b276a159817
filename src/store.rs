//! Out-of-band storage of directive applications, keyed by carrier.

use indexmap::IndexMap;

use crate::application::DirectiveApplication;
use crate::error::ApplyError;
use crate::typesystem::{Carrier, CarrierId};

/// Applications per carrier, per directive name, in application order.
///
/// The store is an ordinary owned value: build one per schema, fill it while
/// constructing types, then hand it to the assembler.
#[derive(Debug, Default, Clone)]
pub struct DirectiveStore {
    carriers: IndexMap<CarrierId, IndexMap<String, Vec<DirectiveApplication>>>,
    next_index: usize,
}

impl DirectiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an application to the carrier's list for its directive.
    ///
    /// # Errors
    ///
    /// Returns `ApplyError::NotRepeatable` if the directive is already on the
    /// carrier and is not repeatable, and `ApplyError::DuplicateApplication`
    /// if a repeatable directive is applied again with identical arguments.
    pub fn attach<C: Carrier + ?Sized>(
        &mut self,
        carrier: &C,
        application: DirectiveApplication,
    ) -> Result<(), ApplyError> {
        let directive = application.name().to_string();
        let list = self
            .carriers
            .entry(carrier.carrier_id())
            .or_default()
            .entry(directive.clone())
            .or_default();

        if !list.is_empty() {
            if !application.definition().is_repeatable() {
                return Err(ApplyError::NotRepeatable {
                    directive,
                    carrier: carrier.carrier_name().to_string(),
                });
            }
            if list
                .iter()
                .any(|existing| existing.arguments() == application.arguments())
            {
                return Err(ApplyError::DuplicateApplication {
                    directive,
                    carrier: carrier.carrier_name().to_string(),
                    arguments: application.arguments().clone(),
                });
            }
        }

        tracing::trace!(
            directive = %directive,
            carrier = carrier.carrier_name(),
            index = self.next_index,
            "attached directive"
        );

        list.push(application.with_index(self.next_index));
        self.next_index += 1;
        Ok(())
    }

    /// Every application on a carrier, grouped by directive in first-use order.
    pub fn applications<C: Carrier + ?Sized>(&self, carrier: &C) -> Vec<&DirectiveApplication> {
        self.carriers
            .get(&carrier.carrier_id())
            .map(|by_directive| by_directive.values().flatten().collect())
            .unwrap_or_default()
    }

    /// Applications of one directive on a carrier, in application order.
    pub fn applications_of(&self, carrier: CarrierId, directive: &str) -> &[DirectiveApplication] {
        self.carriers
            .get(&carrier)
            .and_then(|by_directive| by_directive.get(directive))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of the directives applied to a carrier.
    pub fn directives_on(&self, carrier: CarrierId) -> impl Iterator<Item = &str> {
        self.carriers
            .get(&carrier)
            .into_iter()
            .flat_map(|by_directive| by_directive.keys().map(String::as_str))
    }

    pub fn contains(&self, carrier: CarrierId) -> bool {
        self.carriers
            .get(&carrier)
            .is_some_and(|by_directive| by_directive.values().any(|list| !list.is_empty()))
    }

    /// Total number of applications.
    pub fn len(&self) -> usize {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{DirectiveDefinition, InputValue};
    use crate::types::{DirectiveLocation, TypeRef};
    use crate::typesystem::ObjectType;
    use crate::value::{Arguments, Value};
    use std::sync::Arc;

    fn directive(name: &str, repeatable: bool) -> Arc<DirectiveDefinition> {
        DirectiveDefinition::builder(name)
            .location(DirectiveLocation::Object)
            .argument(InputValue::new("max_age", TypeRef::named("Int")))
            .repeatable(repeatable)
            .build()
            .unwrap()
    }

    fn application(definition: &Arc<DirectiveDefinition>, max_age: i64) -> DirectiveApplication {
        let mut arguments = Arguments::new();
        arguments.insert("max_age".into(), Value::Int(max_age));
        DirectiveApplication::new(Arc::clone(definition), arguments)
    }

    #[test]
    fn first_attach_creates_the_list() {
        let mut store = DirectiveStore::new();
        let object = ObjectType::new("Human");
        let cache = directive("cache", false);

        store.attach(&object, application(&cache, 60)).unwrap();

        assert!(store.contains(object.carrier_id()));
        assert_eq!(store.applications_of(object.carrier_id(), "cache").len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn non_repeatable_rejects_second_application() {
        let mut store = DirectiveStore::new();
        let object = ObjectType::new("Human");
        let auth = directive("authenticated", false);

        store.attach(&object, application(&auth, 1)).unwrap();
        let err = store.attach(&object, application(&auth, 2)).unwrap_err();

        assert!(matches!(err, ApplyError::NotRepeatable { .. }));
        assert_eq!(store.applications_of(object.carrier_id(), "authenticated").len(), 1);
    }

    #[test]
    fn repeatable_keeps_insertion_order() {
        let mut store = DirectiveStore::new();
        let object = ObjectType::new("Animal");
        let cache = directive("cache", true);

        store.attach(&object, application(&cache, 100)).unwrap();
        store.attach(&object, application(&cache, 30)).unwrap();

        let list = store.applications_of(object.carrier_id(), "cache");
        assert_eq!(list[0].arguments()["max_age"], Value::Int(100));
        assert_eq!(list[1].arguments()["max_age"], Value::Int(30));
        assert!(list[0].index() < list[1].index());
    }

    #[test]
    fn repeatable_rejects_identical_arguments() {
        let mut store = DirectiveStore::new();
        let object = ObjectType::new("Test");
        let cache = directive("cache", true);

        store.attach(&object, application(&cache, 20)).unwrap();
        let err = store.attach(&object, application(&cache, 20)).unwrap_err();
        assert!(matches!(err, ApplyError::DuplicateApplication { .. }));
    }

    #[test]
    fn applications_are_grouped_by_directive() {
        let mut store = DirectiveStore::new();
        let object = ObjectType::new("Animal");
        let cache = directive("cache", true);
        let auth = directive("authenticated", false);

        store.attach(&object, application(&cache, 1)).unwrap();
        store.attach(&object, application(&auth, 2)).unwrap();
        store.attach(&object, application(&cache, 3)).unwrap();

        let names: Vec<_> = store
            .applications(&object)
            .into_iter()
            .map(|a| a.name())
            .collect();
        assert_eq!(names, vec!["cache", "cache", "authenticated"]);
        assert_eq!(
            store.directives_on(object.carrier_id()).collect::<Vec<_>>(),
            vec!["cache", "authenticated"]
        );
    }

    #[test]
    fn unknown_carrier_has_no_applications() {
        let store = DirectiveStore::new();
        let object = ObjectType::new("Nothing");
        assert!(store.applications(&object).is_empty());
        assert!(store.applications_of(object.carrier_id(), "cache").is_empty());
        assert!(!store.contains(object.carrier_id()));
    }
}
