use crate::{VolumeError, VolumeResult};

use super::{Portal, Target};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Name prefixes a bare discovery line may start with to be taken as an IQN on its own.
const NAME_PREFIXES: [&str; 3] = ["iqn.", "eui.", "naa."];

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Parses `iscsiadm --mode discovery` output into the targets it lists.
///
/// Each non-blank line has the form `<portal-info> <iqn>`. The first whitespace-separated token
/// is discarded and the trimmed remainder is the target name. A line made of a single token is
/// accepted only when that token is itself an iSCSI name (`iqn.`, `eui.` or `naa.`). Any other
/// line fails the whole parse with [`VolumeError::MalformedDiscoveryLine`].
///
/// ## Examples
///
/// ```
/// use std::sync::Arc;
///
/// use monovolumes::{config::IscsiConfig, iscsi::{parse_targets, Initiator}};
///
/// let initiator = Arc::new(Initiator::new(IscsiConfig::default()));
/// let portal = initiator.portal("10.0.10.10", None);
///
/// let targets = parse_targets(&portal, "10.0.10.10:3260,1 iqn.2019.com.example:redis\n").unwrap();
/// assert_eq!(targets[0].iqn(), "iqn.2019.com.example:redis");
/// ```
pub fn parse_targets(portal: &Portal, output: &str) -> VolumeResult<Vec<Target>> {
    let mut targets = Vec::new();
    for (index, line) in output.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let iqn = parse_target_name(line).ok_or_else(|| VolumeError::MalformedDiscoveryLine {
            line_number: index + 1,
            line: line.to_string(),
        })?;

        targets.push(Target::new(portal, iqn));
    }

    Ok(targets)
}

fn parse_target_name(line: &str) -> Option<&str> {
    match line.split_once(char::is_whitespace) {
        Some((_, rest)) => {
            let name = rest.trim();
            (!name.is_empty()).then_some(name)
        }
        None => NAME_PREFIXES
            .iter()
            .any(|prefix| line.starts_with(prefix))
            .then_some(line),
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{config::IscsiConfig, iscsi::Initiator};

    use super::*;

    fn portal() -> Portal {
        Arc::new(Initiator::new(IscsiConfig::default())).portal("10.0.10.10", None)
    }

    #[test]
    fn test_parse_targets_skips_blank_lines() {
        let portal = portal();
        let output =
            "10.0.10.10:3260,1 iqn.2019.com.example:redis\n\niqn.2019.com.example:backup";

        let targets = parse_targets(&portal, output).unwrap();
        let iqns: Vec<_> = targets.iter().map(Target::iqn).collect();

        assert_eq!(
            iqns,
            ["iqn.2019.com.example:redis", "iqn.2019.com.example:backup"]
        );
        assert!(targets
            .iter()
            .all(|target| target.portal_address() == portal.address()));
    }

    #[test]
    fn test_parse_targets_empty_output() {
        assert!(parse_targets(&portal(), "").unwrap().is_empty());
        assert!(parse_targets(&portal(), "\n  \n\t\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_targets_handles_tabs_and_crlf() {
        let output = "10.0.10.10:3260,1\tiqn.2019.com.example:redis\r\n\
                      [fe80::1]:3260,1  iqn.2019.com.example:logs  \r\n";

        let targets = parse_targets(&portal(), output).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].iqn(), "iqn.2019.com.example:redis");
        assert_eq!(targets[1].iqn(), "iqn.2019.com.example:logs");
    }

    #[test]
    fn test_parse_targets_rejects_line_without_target_name() {
        let output = "10.0.10.10:3260,1 iqn.2019.com.example:redis\ngarbage\n";

        match parse_targets(&portal(), output) {
            Err(VolumeError::MalformedDiscoveryLine { line_number, line }) => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "garbage");
            }
            other => panic!("expected malformed line error, got {:?}", other),
        }
    }
}
