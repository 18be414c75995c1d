/// Returns the base 2 logarithm of the number, rounded down.
///
/// When `x` is zero the result is undefined
pub const fn ilog_2(x: usize) -> u32 {
    let mut x_ = x;
    let mut res = 0;
    while 1 < x_ {
        x_ /= 2;
        res += 1;
    }
    res
}

/// `msb_index(x)` is the index of the most significant set bit of `x`, or `None` if no bits are set
pub const fn msb_index(x: u32) -> Option<u8> {
    if x == 0 {
        None
    } else {
        Some((u32::BITS - 1 - x.leading_zeros()) as u8)
    }
}

#[cfg(test)]
/// `is_almost(v1, v2, e)` is true iff `v1` is within `e` of `v2`
pub fn is_almost(v1: f32, v2: f32, eps: f32) -> bool {
    fabs(v1 - v2) <= eps
}

#[cfg(test)]
/// `fabs(v)` is the absolute value of `v`
pub fn fabs(v: f32) -> f32 {
    if v < 0.0 {
        -v
    } else {
        v
    }
}
