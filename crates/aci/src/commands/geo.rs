//! Geolocation command handlers.

use aci_core::{Location, LocationLevel};

use crate::cli::{GeoArgs, GeoCommand, GlobalOpts, LocationPath};
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

/// Expand a `--site/--building/...` path into its locations, outermost
/// first. The last entry is the target.
fn chain(path: &LocationPath) -> Vec<Location> {
    let levels = [
        (LocationLevel::Building, &path.building),
        (LocationLevel::Floor, &path.floor),
        (LocationLevel::Room, &path.room),
        (LocationLevel::Row, &path.row),
        (LocationLevel::Rack, &path.rack),
    ];
    let mut locations = vec![Location::site(path.site.clone())];
    locations.extend(
        levels
            .into_iter()
            .map_while(|(level, name)| name.as_ref().map(|n| Location::new(level, n.clone()))),
    );
    locations
}

/// Split a chain into its target and ancestors.
fn split(locations: &mut Vec<Location>) -> Result<(Location, Vec<&Location>), CliError> {
    let target = locations.pop().ok_or_else(|| CliError::Validation {
        field: "site".into(),
        reason: "a location path needs at least a site".into(),
    })?;
    Ok((target, locations.iter().collect()))
}

fn describe(location: &Location) -> String {
    format!("{} '{}'", location.level, location.name)
}

fn render_trees(sites: &[Location]) -> String {
    sites
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: GeoArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        GeoCommand::List => {
            let sites = session.client().await?.list_sites().await?;
            let out = output::render_single(&global.output, &sites, |s| render_trees(s), |s| {
                s.iter().map(|l| l.name.clone()).collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GeoCommand::Show { site } => {
            let found = session.client().await?.get_site(&site).await?;
            let site = found.ok_or_else(|| CliError::NotFound {
                resource_type: "site".into(),
                identifier: site,
                list_command: "geo list".into(),
            })?;
            let out = output::render_single(&global.output, &site, ToString::to_string, |s| {
                s.name.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GeoCommand::Add { path, description } => {
            let mut locations = chain(&path);
            let (mut target, ancestors) = split(&mut locations)?;
            if let Some(description) = description {
                target
                    .set_description(description)
                    .map_err(util::invalid("description"))?;
            }
            session
                .client()
                .await?
                .add_location(&target, &ancestors)
                .await?;
            output::print_status(&format!("Created {}", describe(&target)), global.quiet);
            Ok(())
        }

        GeoCommand::Update { path, description } => {
            let mut locations = chain(&path);
            let (mut target, ancestors) = split(&mut locations)?;
            target
                .set_description(description)
                .map_err(util::invalid("description"))?;
            session
                .client()
                .await?
                .update_location(&target, &ancestors)
                .await?;
            output::print_status(&format!("Updated {}", describe(&target)), global.quiet);
            Ok(())
        }

        GeoCommand::Delete { path } => {
            let mut locations = chain(&path);
            let (target, ancestors) = split(&mut locations)?;
            if !util::confirm(
                &format!("Delete {} and everything below it?", describe(&target)),
                global.yes,
            )? {
                return Ok(());
            }
            session
                .client()
                .await?
                .delete_location(&target, &ancestors)
                .await?;
            output::print_status(&format!("Deleted {}", describe(&target)), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn path(building: Option<&str>, floor: Option<&str>) -> LocationPath {
        LocationPath {
            site: "hq".into(),
            building: building.map(Into::into),
            floor: floor.map(Into::into),
            room: None,
            row: None,
            rack: None,
        }
    }

    #[test]
    fn deepest_level_is_the_target() {
        let mut locations = chain(&path(Some("b1"), Some("f2")));
        let (target, ancestors) = split(&mut locations).unwrap();
        assert_eq!(target.level, LocationLevel::Floor);
        assert_eq!(target.name, "f2");
        let names: Vec<&str> = ancestors.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["hq", "b1"]);
    }

    #[test]
    fn site_alone_has_no_ancestors() {
        let mut locations = chain(&path(None, None));
        let (target, ancestors) = split(&mut locations).unwrap();
        assert_eq!(target.level, LocationLevel::Site);
        assert!(ancestors.is_empty());
    }
}
