//! Print the node registry.

pub fn run(names_only: bool) -> anyhow::Result<()> {
    if names_only {
        for (id, name) in vace_node_registry::display_names() {
            println!("{id}: {name}");
        }
    } else {
        println!("{}", vace_node_registry::registry_json()?);
    }
    Ok(())
}
