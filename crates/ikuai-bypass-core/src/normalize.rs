// ── Line normalization ──
//
// Raw list bodies become entry lists before partitioning. Every category
// gets line splitting; IP-oriented categories additionally lose blank
// lines and IPv6 entries (the router tables only take IPv4).

/// Split a body into lines, dropping `\r` and trailing empty lines.
pub fn split_lines(body: &str) -> Vec<String> {
    let mut lines: Vec<String> = body
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
        .collect();
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Keep IPv4 entries only: trims whitespace, drops blank lines and any
/// entry containing `:`. Applying it twice is the same as applying it once.
pub fn strip_ipv6(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .filter_map(|line| {
            let entry = line.trim();
            (!entry.is_empty() && !entry.contains(':')).then(|| entry.to_owned())
        })
        .collect()
}

/// Lines of an IP list body, ready for partitioning.
pub fn ip_entries(body: &str) -> Vec<String> {
    strip_ipv6(split_lines(body))
}

/// Lines of a domain list body. Entries are not filtered, but `\r` and
/// trailing empty lines are stripped like for every other list, so a
/// final newline does not add an empty domain.
pub fn domain_entries(body: &str) -> Vec<String> {
    split_lines(body)
}
