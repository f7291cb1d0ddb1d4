use std::collections::HashSet;

use futures::future::{BoxFuture, FutureExt};

use super::Error;
use crate::cloud::{CloudQuery, StackResource};
use crate::resources::{ResourceSummary, ResourceType};

#[derive(Default)]
struct Enumeration {
    summaries: Vec<ResourceSummary>,
    seen: HashSet<(ResourceType, String)>,
    walked_stacks: HashSet<String>,
}

/// Lists every resource of `stack_name`, nested stacks expanded in place.
///
/// The result holds each `(type, physical id)` pair once and never contains
/// the nested stack resources themselves.
pub async fn enumerate(
    cloud: &dyn CloudQuery,
    stack_name: &str,
) -> Result<Vec<ResourceSummary>, Error> {
    let mut enumeration = Enumeration::default();
    enumerate_stack(cloud, stack_name, &mut enumeration).await?;

    tracing::info!(
        stack = stack_name,
        count = enumeration.summaries.len(),
        "Enumerated stack resources"
    );
    return Ok(enumeration.summaries);
}

fn enumerate_stack<'a>(
    cloud: &'a dyn CloudQuery,
    stack_name: &'a str,
    enumeration: &'a mut Enumeration,
) -> BoxFuture<'a, Result<(), Error>> {
    async move {
        if !enumeration.walked_stacks.insert(stack_name.to_string()) {
            return Ok(());
        }

        for resource in list_all(cloud, stack_name).await? {
            let physical_id = match resource.physical_id {
                Some(physical_id) => physical_id,
                None => {
                    tracing::warn!(
                        stack = stack_name,
                        logical_id = %resource.logical_id,
                        "Skipping resource without a physical id"
                    );
                    continue;
                }
            };

            let summary = ResourceSummary::new(
                ResourceType::from_cfn(&resource.resource_type),
                resource.logical_id,
                physical_id,
            );

            if summary.resource_type == ResourceType::NestedStack {
                let nested_stack = summary.nested_stack_name().to_string();
                tracing::debug!(parent = stack_name, nested = %nested_stack, "Expanding nested stack");
                enumerate_stack(cloud, &nested_stack, enumeration).await?;
                continue;
            }

            let key = (summary.resource_type.clone(), summary.physical_id.clone());
            if enumeration.seen.insert(key) {
                enumeration.summaries.push(summary);
            }
        }

        Ok(())
    }
    .boxed()
}

async fn list_all(cloud: &dyn CloudQuery, stack_name: &str) -> Result<Vec<StackResource>, Error> {
    let mut resources = Vec::new();
    let mut next_token = None;

    loop {
        let page = cloud
            .list_stack_resources(stack_name, next_token)
            .await
            .map_err(|source| Error::Discovery {
                stack: stack_name.to_string(),
                source,
            })?;

        resources.extend(page.items);
        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }

    return Ok(resources);
}
