use crate::error::Result;
use crate::graph::GraphClient;
use crate::graph::directory::{self, DirectoryObject, Group};
use std::io::Write;

fn section<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out, "\n\nREQUEST {}:", title)?;
    Ok(())
}

fn request_url<W: Write>(out: &mut W, url: &str) -> Result<()> {
    writeln!(out, "\nGraph Request:")?;
    writeln!(out, "{}", url)?;
    Ok(())
}

fn entry<W: Write>(
    out: &mut W,
    id: &str,
    display_name: Option<&str>,
    mail: Option<&str>,
) -> Result<()> {
    writeln!(
        out,
        "{}: {} <{}>",
        id,
        display_name.unwrap_or_default(),
        mail.unwrap_or_default()
    )?;
    Ok(())
}

pub fn write_group<W: Write>(out: &mut W, group: &Group) -> Result<()> {
    entry(out, &group.id, group.display_name.as_deref(), group.mail.as_deref())
}

/// Print the users in a mixed collection, skipping every other type
pub fn write_users<W: Write>(out: &mut W, objects: &[DirectoryObject]) -> Result<()> {
    for user in objects.iter().filter_map(DirectoryObject::as_user) {
        entry(out, &user.id, user.display_name.as_deref(), user.mail.as_deref())?;
    }
    Ok(())
}

pub fn write_owned_objects<W: Write>(out: &mut W, objects: &[DirectoryObject]) -> Result<()> {
    for object in objects {
        match object {
            DirectoryObject::Group(group) => writeln!(
                out,
                "Office 365 Group: {}: {}",
                group.id,
                group.display_name.as_deref().unwrap_or_default()
            )?,
            DirectoryObject::DirectoryRole(role) => writeln!(
                out,
                "  Security Group: {}: {}",
                role.id,
                role.display_name.as_deref().unwrap_or_default()
            )?,
            other => writeln!(out, "{}: {}", other.odata_type(), other.id())?,
        }
    }
    Ok(())
}

/// Run the five directory requests in order, printing each result set and
/// the URL it was fetched from. `owner_client` serves the signed-in user's
/// owned objects.
pub async fn run<W: Write>(
    client: &GraphClient,
    owner_client: &GraphClient,
    group_id: &str,
    out: &mut W,
) -> Result<()> {
    section(out, "1 - ALL GROUPS")?;
    let request = directory::groups(client);
    let groups: Vec<Group> = request.get_first_page().await?;
    for group in &groups {
        write_group(out, group)?;
    }
    request_url(out, request.url())?;

    section(out, "2 - ONE GROUP")?;
    let request = directory::group(client, group_id);
    let group: Group = request.get().await?;
    write_group(out, &group)?;
    request_url(out, request.url())?;

    section(out, "3 - GROUP OWNERS")?;
    let request = directory::group_owners(client, group_id);
    let owners: Vec<DirectoryObject> = request.get_first_page().await?;
    write_users(out, &owners)?;
    request_url(out, request.url())?;

    section(out, "4 - GROUP MEMBERS")?;
    let request = directory::group_members(client, group_id);
    let members: Vec<DirectoryObject> = request.get_first_page().await?;
    write_users(out, &members)?;
    request_url(out, request.url())?;

    section(out, "5 - OWNED OBJECTS")?;
    let request = directory::my_owned_objects(owner_client);
    let owned: Vec<DirectoryObject> = request.get_first_page().await?;
    write_owned_objects(out, &owned)?;
    request_url(out, request.url())?;

    Ok(())
}
