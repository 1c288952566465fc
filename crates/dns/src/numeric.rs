use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Parses `name` the way `getaddrinfo` does with `AI_NUMERICHOST`.
///
/// IPv4 accepts the classic `inet_aton` spellings: one to four dot-separated
/// components, each decimal, octal (leading `0`), or hexadecimal (`0x`), with
/// the last component filling the remaining bytes. IPv6 accepts the standard
/// textual form with an optional non-empty `%zone` suffix.
#[must_use]
pub fn parse_numeric_host(name: &str) -> Option<IpAddr> {
    if let Some(v4) = parse_inet_aton(name) {
        return Some(IpAddr::V4(v4));
    }

    let address = match name.split_once('%') {
        Some((_, "")) => return None,
        Some((address, _zone)) => address,
        None => name,
    };
    address.parse::<Ipv6Addr>().ok().map(IpAddr::V6)
}

fn parse_inet_aton(text: &str) -> Option<Ipv4Addr> {
    if text.is_empty() {
        return None;
    }

    let mut parts = [0u32; 4];
    let mut count = 0usize;
    for part in text.split('.') {
        if count == parts.len() {
            return None;
        }
        parts[count] = parse_component(part)?;
        count += 1;
    }

    let [a, b, c, d] = parts;
    let value = match count {
        1 => a,
        2 if a <= 0xff && b <= 0x00ff_ffff => (a << 24) | b,
        3 if a <= 0xff && b <= 0xff && c <= 0xffff => (a << 24) | (b << 16) | c,
        4 if a <= 0xff && b <= 0xff && c <= 0xff && d <= 0xff => {
            (a << 24) | (b << 16) | (c << 8) | d
        }
        _ => return None,
    };
    Some(Ipv4Addr::from(value))
}

fn parse_component(part: &str) -> Option<u32> {
    let (digits, radix) = if let Some(hex) = part
        .strip_prefix("0x")
        .or_else(|| part.strip_prefix("0X"))
    {
        (hex, 16)
    } else if part.len() > 1 && part.starts_with('0') {
        (&part[1..], 8)
    } else {
        (part, 10)
    };

    if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(a, b, c, d)))
    }

    #[test]
    fn dotted_quad() {
        assert_eq!(parse_numeric_host("192.0.2.33"), v4(192, 0, 2, 33));
        assert_eq!(parse_numeric_host("0.0.0.0"), v4(0, 0, 0, 0));
    }

    #[test]
    fn short_forms_fill_trailing_bytes() {
        assert_eq!(parse_numeric_host("127.1"), v4(127, 0, 0, 1));
        assert_eq!(parse_numeric_host("10.1.257"), v4(10, 1, 1, 1));
        assert_eq!(parse_numeric_host("2130706433"), v4(127, 0, 0, 1));
    }

    #[test]
    fn octal_and_hex_components() {
        assert_eq!(parse_numeric_host("0x7f.0.0.1"), v4(127, 0, 0, 1));
        assert_eq!(parse_numeric_host("0177.0.0.01"), v4(127, 0, 0, 1));
        assert_eq!(parse_numeric_host("0X0A000001"), v4(10, 0, 0, 1));
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert_eq!(parse_numeric_host("256.1.1.1"), None);
        assert_eq!(parse_numeric_host("1.256.1"), None);
        assert_eq!(parse_numeric_host("4294967296"), None);
        assert_eq!(parse_numeric_host("08.1.1.1"), None);
    }

    #[test]
    fn rejects_malformed_dotted_forms() {
        assert_eq!(parse_numeric_host(""), None);
        assert_eq!(parse_numeric_host("1.2.3.4."), None);
        assert_eq!(parse_numeric_host("1..2"), None);
        assert_eq!(parse_numeric_host("1.2.3.4.5"), None);
        assert_eq!(parse_numeric_host("0x"), None);
        assert_eq!(parse_numeric_host("+1.2.3.4"), None);
    }

    #[test]
    fn hostnames_are_not_numeric() {
        assert_eq!(parse_numeric_host("localhost"), None);
        assert_eq!(parse_numeric_host("1.2.3.4.in-addr.arpa"), None);
        assert_eq!(parse_numeric_host("mail.example.com"), None);
    }

    #[test]
    fn ipv6_literals_with_optional_zone() {
        assert_eq!(
            parse_numeric_host("2001:db8::1"),
            Some(IpAddr::V6("2001:db8::1".parse().expect("literal")))
        );
        assert_eq!(
            parse_numeric_host("fe80::1%eth0"),
            Some(IpAddr::V6("fe80::1".parse().expect("literal")))
        );
        assert_eq!(
            parse_numeric_host("::ffff:192.0.2.1"),
            Some(IpAddr::V6("::ffff:192.0.2.1".parse().expect("literal")))
        );
        assert_eq!(parse_numeric_host("fe80::1%"), None);
        assert_eq!(parse_numeric_host("[::1]"), None);
    }
}
