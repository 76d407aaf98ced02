/// Ordered-dither threshold matrix, values `0..=63`.
pub const BAYER: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Row-only projection of [`BAYER`] (its first column), used to gate whole spans.
pub const BAYER_ROW: [u8; 8] = {
    let mut row = [0u8; 8];
    let mut i = 0;
    while i < 8 {
        row[i] = BAYER[i][0];
        i += 1;
    }
    row
};

/// Size of the dither matrix along each axis.
pub const BAYER_SIZE: i32 = 8;

/// Sine in 10-bit fixed point (`sin(deg) * 1024`), one entry per degree.
pub const SIN_1024: [i32; 360] = [
    0, 18, 36, 54, 71, 89, 107, 125, 143, 160, 178, 195,
    213, 230, 248, 265, 282, 299, 316, 333, 350, 367, 384, 400,
    416, 433, 449, 465, 481, 496, 512, 527, 543, 558, 573, 587,
    602, 616, 630, 644, 658, 672, 685, 698, 711, 724, 737, 749,
    761, 773, 784, 796, 807, 818, 828, 839, 849, 859, 868, 878,
    887, 896, 904, 912, 920, 928, 935, 943, 949, 956, 962, 968,
    974, 979, 984, 989, 994, 998, 1002, 1005, 1008, 1011, 1014, 1016,
    1018, 1020, 1022, 1023, 1023, 1024, 1024, 1024, 1023, 1023, 1022, 1020,
    1018, 1016, 1014, 1011, 1008, 1005, 1002, 998, 994, 989, 984, 979,
    974, 968, 962, 956, 949, 943, 935, 928, 920, 912, 904, 896,
    887, 878, 868, 859, 849, 839, 828, 818, 807, 796, 784, 773,
    761, 749, 737, 724, 711, 698, 685, 672, 658, 644, 630, 616,
    602, 587, 573, 558, 543, 527, 512, 496, 481, 465, 449, 433,
    416, 400, 384, 367, 350, 333, 316, 299, 282, 265, 248, 230,
    213, 195, 178, 160, 143, 125, 107, 89, 71, 54, 36, 18,
    0, -18, -36, -54, -71, -89, -107, -125, -143, -160, -178, -195,
    -213, -230, -248, -265, -282, -299, -316, -333, -350, -367, -384, -400,
    -416, -433, -449, -465, -481, -496, -512, -527, -543, -558, -573, -587,
    -602, -616, -630, -644, -658, -672, -685, -698, -711, -724, -737, -749,
    -761, -773, -784, -796, -807, -818, -828, -839, -849, -859, -868, -878,
    -887, -896, -904, -912, -920, -928, -935, -943, -949, -956, -962, -968,
    -974, -979, -984, -989, -994, -998, -1002, -1005, -1008, -1011, -1014, -1016,
    -1018, -1020, -1022, -1023, -1023, -1024, -1024, -1024, -1023, -1023, -1022, -1020,
    -1018, -1016, -1014, -1011, -1008, -1005, -1002, -998, -994, -989, -984, -979,
    -974, -968, -962, -956, -949, -943, -935, -928, -920, -912, -904, -896,
    -887, -878, -868, -859, -849, -839, -828, -818, -807, -796, -784, -773,
    -761, -749, -737, -724, -711, -698, -685, -672, -658, -644, -630, -616,
    -602, -587, -573, -558, -543, -527, -512, -496, -481, -465, -449, -433,
    -416, -400, -384, -367, -350, -333, -316, -299, -282, -265, -248, -230,
    -213, -195, -178, -160, -143, -125, -107, -89, -71, -54, -36, -18,
];

/// Sine in 8-bit fixed point (`sin(deg) * 256`), one entry per degree.
pub const SIN_256: [i32; 360] = [
    0, 4, 9, 13, 18, 22, 27, 31, 36, 40, 44, 49,
    53, 58, 62, 66, 71, 75, 79, 83, 88, 92, 96, 100,
    104, 108, 112, 116, 120, 124, 128, 132, 136, 139, 143, 147,
    150, 154, 158, 161, 165, 168, 171, 175, 178, 181, 184, 187,
    190, 193, 196, 199, 202, 204, 207, 210, 212, 215, 217, 219,
    222, 224, 226, 228, 230, 232, 234, 236, 237, 239, 241, 242,
    243, 245, 246, 247, 248, 249, 250, 251, 252, 253, 254, 254,
    255, 255, 255, 256, 256, 256, 256, 256, 256, 256, 255, 255,
    255, 254, 254, 253, 252, 251, 250, 249, 248, 247, 246, 245,
    243, 242, 241, 239, 237, 236, 234, 232, 230, 228, 226, 224,
    222, 219, 217, 215, 212, 210, 207, 204, 202, 199, 196, 193,
    190, 187, 184, 181, 178, 175, 171, 168, 165, 161, 158, 154,
    150, 147, 143, 139, 136, 132, 128, 124, 120, 116, 112, 108,
    104, 100, 96, 92, 88, 83, 79, 75, 71, 66, 62, 58,
    53, 49, 44, 40, 36, 31, 27, 22, 18, 13, 9, 4,
    0, -4, -9, -13, -18, -22, -27, -31, -36, -40, -44, -49,
    -53, -58, -62, -66, -71, -75, -79, -83, -88, -92, -96, -100,
    -104, -108, -112, -116, -120, -124, -128, -132, -136, -139, -143, -147,
    -150, -154, -158, -161, -165, -168, -171, -175, -178, -181, -184, -187,
    -190, -193, -196, -199, -202, -204, -207, -210, -212, -215, -217, -219,
    -222, -224, -226, -228, -230, -232, -234, -236, -237, -239, -241, -242,
    -243, -245, -246, -247, -248, -249, -250, -251, -252, -253, -254, -254,
    -255, -255, -255, -256, -256, -256, -256, -256, -256, -256, -255, -255,
    -255, -254, -254, -253, -252, -251, -250, -249, -248, -247, -246, -245,
    -243, -242, -241, -239, -237, -236, -234, -232, -230, -228, -226, -224,
    -222, -219, -217, -215, -212, -210, -207, -204, -202, -199, -196, -193,
    -190, -187, -184, -181, -178, -175, -171, -168, -165, -161, -158, -154,
    -150, -147, -143, -139, -136, -132, -128, -124, -120, -116, -112, -108,
    -104, -100, -96, -92, -88, -83, -79, -75, -71, -66, -62, -58,
    -53, -49, -44, -40, -36, -31, -27, -22, -18, -13, -9, -4,
];

/// `sqrt(i / 255) * 255`, rounded.
pub const SQRT_LUT: [u8; 256] = [
    0, 16, 23, 28, 32, 36, 39, 42, 45, 48, 50, 53, 55, 58, 60, 62,
    64, 66, 68, 70, 71, 73, 75, 77, 78, 80, 81, 83, 84, 86, 87, 89,
    90, 92, 93, 94, 96, 97, 98, 100, 101, 102, 103, 105, 106, 107, 108, 109,
    111, 112, 113, 114, 115, 116, 117, 118, 119, 121, 122, 123, 124, 125, 126, 127,
    128, 129, 130, 131, 132, 133, 134, 135, 135, 136, 137, 138, 139, 140, 141, 142,
    143, 144, 145, 145, 146, 147, 148, 149, 150, 151, 151, 152, 153, 154, 155, 156,
    156, 157, 158, 159, 160, 160, 161, 162, 163, 164, 164, 165, 166, 167, 167, 168,
    169, 170, 170, 171, 172, 173, 173, 174, 175, 176, 176, 177, 178, 179, 179, 180,
    181, 181, 182, 183, 183, 184, 185, 186, 186, 187, 188, 188, 189, 190, 190, 191,
    192, 192, 193, 194, 194, 195, 196, 196, 197, 198, 198, 199, 199, 200, 201, 201,
    202, 203, 203, 204, 204, 205, 206, 206, 207, 208, 208, 209, 209, 210, 211, 211,
    212, 212, 213, 214, 214, 215, 215, 216, 217, 217, 218, 218, 219, 220, 220, 221,
    221, 222, 222, 223, 224, 224, 225, 225, 226, 226, 227, 228, 228, 229, 229, 230,
    230, 231, 231, 232, 233, 233, 234, 234, 235, 235, 236, 236, 237, 237, 238, 238,
    239, 240, 240, 241, 241, 242, 242, 243, 243, 244, 244, 245, 245, 246, 246, 247,
    247, 248, 248, 249, 249, 250, 250, 251, 251, 252, 252, 253, 253, 254, 254, 255,
];

/// Normalise an angle in degrees to a table index in `0..360`.
pub fn degrees(angle: i32) -> usize {
    angle.rem_euclid(360) as usize
}

/// `(sin, cos)` of `angle` at the 10-bit per-pixel rotation scale.
pub fn sin_cos_1024(angle: i32) -> (i32, i32) {
    let a = degrees(angle);
    (SIN_1024[a], SIN_1024[(a + 90) % 360])
}

/// `(sin, cos)` of `angle` at the 8-bit bounding-box scale.
pub fn sin_cos_256(angle: i32) -> (i32, i32) {
    let a = degrees(angle);
    (SIN_256[a], SIN_256[(a + 90) % 360])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bayer_is_a_permutation() {
        let mut seen = [false; 64];
        for row in BAYER.iter() {
            for &v in row.iter() {
                assert!(!seen[v as usize], "duplicate threshold {v}");
                seen[v as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_bayer_row_is_first_column() {
        assert_eq!(BAYER_ROW, [0, 48, 12, 60, 3, 51, 15, 63]);
    }

    #[test]
    fn test_sin_cos_quadrants() {
        assert_eq!(sin_cos_1024(0), (0, 1024));
        assert_eq!(sin_cos_1024(90), (1024, 0));
        assert_eq!(sin_cos_1024(180), (0, -1024));
        assert_eq!(sin_cos_1024(270), (-1024, 0));
        assert_eq!(sin_cos_256(30), (128, 222));
    }

    #[test]
    fn test_negative_angles_wrap() {
        assert_eq!(degrees(-90), 270);
        assert_eq!(degrees(720), 0);
        assert_eq!(sin_cos_1024(-90), sin_cos_1024(270));
    }

    #[test]
    fn test_sqrt_lut_endpoints() {
        assert_eq!(SQRT_LUT[0], 0);
        assert_eq!(SQRT_LUT[255], 255);
        assert_eq!(SQRT_LUT[64], 128);
        assert!(SQRT_LUT.windows(2).all(|w| w[0] <= w[1]));
    }
}
