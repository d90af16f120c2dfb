/// Extracts the organization domain from a mail address. Lazy organization
/// creation keys on this, so the result is lowercased and must be a plausible
/// host: non-empty, no whitespace, at least one dot.
pub fn org_domain(address: &str) -> Option<String> {
	let trimmed = address.trim();
	let (local, host) = trimmed.rsplit_once('@')?;

	if local.is_empty() || host.is_empty() {
		return None;
	}
	if host.contains(char::is_whitespace) || host.contains('@') {
		return None;
	}
	if !host.contains('.') || host.starts_with('.') || host.ends_with('.') {
		return None;
	}

	Some(host.to_ascii_lowercase())
}
