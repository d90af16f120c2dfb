use vergen_gitcl::{CargoBuilder, Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// fail_on_error stays off so builds outside a git checkout emit defaults.
	Emitter::default()
		.add_instructions(&CargoBuilder::all_cargo()?)?
		.add_instructions(&GitclBuilder::all_git()?)?
		.emit()?;

	Ok(())
}
