//! DigitalOcean domain records

use crate::api::{CreateDomainRecordRequest, DomainRecordsPage};
use crate::provider::DigitalOceanProvider;
use async_trait::async_trait;
use harbormaster_cloud::{
    ApiRequest, CloudError, Collection, DnsProvider, DnsRecord, DnsRecordSpec, Event, Outcome,
    ReconcileDecision, ResourceKind, Result, names_match,
};

#[async_trait]
impl DnsProvider for DigitalOceanProvider {
    fn name(&self) -> &str {
        "digitalocean"
    }

    fn display_name(&self) -> &str {
        "DigitalOcean"
    }

    async fn find_record(&self, domain: &str, subdomain: &str) -> Result<Option<DnsRecord>> {
        let collection = Collection::new(format!("domains/{}/records", domain.to_lowercase()));
        let record = self
            .locator
            .find::<DomainRecordsPage, _>(collection, |r| names_match(&r.name, subdomain))
            .await?;

        self.observer.on_event(&Event::Located {
            kind: ResourceKind::DnsRecord,
            name: subdomain,
            found: record.is_some(),
        });
        Ok(record)
    }

    /// Create the record when absent
    ///
    /// An existing record with the same type and value is left alone. Any
    /// other existing record under the name fails with
    /// [`CloudError::Conflict`] before anything is sent; changing its type or
    /// value is not implemented.
    async fn ensure_record(&self, spec: &DnsRecordSpec) -> Result<Outcome> {
        let domain = spec.domain.to_lowercase();
        let subdomain = spec.name.to_lowercase();

        let existing = self.find_record(&domain, &subdomain).await?;
        let decision = ReconcileDecision::ensure(existing.as_ref(), spec, |current, spec| {
            current.record_type == spec.record_type && current.content == spec.value
        });
        self.observer.on_event(&Event::Decided {
            kind: ResourceKind::DnsRecord,
            name: &subdomain,
            decision: decision.label(),
        });

        match decision {
            ReconcileDecision::Create(spec) => {
                let body = CreateDomainRecordRequest {
                    record_type: &spec.record_type,
                    name: &subdomain,
                    data: &spec.value,
                };
                let request = ApiRequest::post(format!("domains/{}/records", domain), &body)?;
                self.transport
                    .send(&request)
                    .await?
                    .error_for_status(&request)?;
                Ok(Outcome::Changed)
            }
            ReconcileDecision::UpdateNeeded(id, spec) => Err(CloudError::Conflict(format!(
                "record {} ('{}.{}') differs from {} {}; updating it is not implemented",
                id, subdomain, domain, spec.record_type, spec.value
            ))),
            _ => Ok(Outcome::Unchanged),
        }
    }

    async fn delete_record(&self, domain: &str, subdomain: &str) -> Result<Outcome> {
        let domain = domain.to_lowercase();
        let subdomain = subdomain.to_lowercase();

        let existing = self.find_record(&domain, &subdomain).await?;
        let decision = ReconcileDecision::<()>::remove(existing.as_ref());
        self.observer.on_event(&Event::Decided {
            kind: ResourceKind::DnsRecord,
            name: &subdomain,
            decision: decision.label(),
        });

        let ReconcileDecision::Delete(id) = decision else {
            return Ok(Outcome::Unchanged);
        };

        let request = ApiRequest::delete(format!("domains/{}/records/{}", domain, id));
        self.transport
            .send(&request)
            .await?
            .expect_status(&request, 204)?;
        Ok(Outcome::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Harness;
    use harbormaster_cloud::Method;
    use serde_json::{Value, json};

    const RECORDS: &str = "domains/example.com/records";

    fn records(entries: &[(u64, &str, &str)], next: Option<&str>) -> Value {
        let domain_records: Vec<Value> = entries
            .iter()
            .map(|(id, kind, name)| json!({"id": id, "type": kind, "name": name, "data": "203.0.113.7", "ttl": 1800}))
            .collect();
        let links = match next {
            Some(next) => json!({"pages": {"next": next}}),
            None => json!({}),
        };
        json!({"domain_records": domain_records, "links": links, "meta": {"total": entries.len()}})
    }

    fn spec(record_type: &str) -> DnsRecordSpec {
        DnsRecordSpec::new("Example.com", record_type, "WWW", "203.0.113.7")
    }

    #[tokio::test]
    async fn test_ensure_record_twice_is_noop_second_time() {
        let h = Harness::new();
        h.transport.ok_json(RECORDS, records(&[(1, "NS", "@")], None));
        h.transport.ok_json(RECORDS, records(&[(1, "NS", "@"), (2, "A", "www")], None));
        h.transport
            .respond(Method::Post, RECORDS, 201, json!({"domain_record": {"id": 2}}));

        let first = h.provider.ensure_record(&spec("A")).await.unwrap();
        let second = h.provider.ensure_record(&spec("A")).await.unwrap();

        assert_eq!(first, Outcome::Changed);
        assert_eq!(second, Outcome::Unchanged);

        let mutations = h.transport.mutations();
        assert_eq!(mutations.len(), 1);
        assert_eq!(
            mutations[0].body,
            Some(json!({"type": "A", "name": "www", "data": "203.0.113.7"}))
        );
    }

    #[tokio::test]
    async fn test_ensure_record_type_mismatch_is_conflict() {
        let h = Harness::new();
        h.transport.ok_json(RECORDS, records(&[(9, "CNAME", "www")], None));

        let result = h.provider.ensure_record(&spec("A")).await;

        assert!(matches!(result, Err(CloudError::Conflict(_))));
        assert!(h.transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_record_stale_value_is_conflict() {
        let h = Harness::new();
        h.transport.ok_json(
            RECORDS,
            json!({"domain_records": [{"id": 5, "type": "A", "name": "www", "data": "198.51.100.1"}], "links": {}}),
        );

        let result = h.provider.ensure_record(&spec("A")).await;

        assert!(matches!(result, Err(CloudError::Conflict(_))));
        assert!(h.transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_record_lowercase_type_matches_existing() {
        let h = Harness::new();
        h.transport.ok_json(RECORDS, records(&[(2, "A", "www")], None));

        let outcome = h.provider.ensure_record(&spec("a")).await.unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert!(h.transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_record_sends_uppercase_type() {
        let h = Harness::new();
        h.transport.ok_json(RECORDS, records(&[], None));
        h.transport
            .respond(Method::Post, RECORDS, 201, json!({"domain_record": {"id": 4}}));

        h.provider.ensure_record(&spec("aaaa")).await.unwrap();

        assert_eq!(h.transport.mutations()[0].body.as_ref().unwrap()["type"], "AAAA");
    }

    #[tokio::test]
    async fn test_find_record_follows_next_link() {
        let h = Harness::new();
        h.transport.ok_json(
            RECORDS,
            records(&[(1, "A", "api")], Some("https://api.digitalocean.com/v2/domains/example.com/records?page=2")),
        );
        h.transport.ok_json(RECORDS, records(&[(2, "A", "www")], None));

        let record = h.provider.find_record("example.com", "www").await.unwrap().unwrap();

        assert_eq!(record.id, "2");
        assert_eq!(h.transport.requests().len(), 2);
        assert_eq!(h.transport.requests()[1].query_value("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_delete_absent_record_is_noop() {
        let h = Harness::new();
        h.transport.ok_json(RECORDS, records(&[(1, "A", "api")], None));

        let outcome = h.provider.delete_record("example.com", "www").await.unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert!(h.transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_record_by_id() {
        let h = Harness::new();
        h.transport.ok_json(RECORDS, records(&[(3, "A", "www")], None));
        h.transport
            .respond_empty(Method::Delete, "domains/example.com/records/3", 204);

        let outcome = h.provider.delete_record("example.com", "WWW").await.unwrap();

        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(h.transport.count(Method::Delete, "domains/example.com/records/3"), 1);
    }

    #[tokio::test]
    async fn test_delete_record_requires_no_content() {
        let h = Harness::new();
        h.transport.ok_json(RECORDS, records(&[(3, "A", "www")], None));
        h.transport
            .respond_empty(Method::Delete, "domains/example.com/records/3", 200);

        let result = h.provider.delete_record("example.com", "www").await;

        assert!(matches!(
            result,
            Err(CloudError::UnexpectedStatus { status: 200, .. })
        ));
    }
}
