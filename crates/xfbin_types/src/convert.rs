//! Coordinate space conversion between XFBIN data and a Z-up host.
//!
//! XFBIN stores positions in centimetres in a Y-up space and rotations in
//! degrees. Hosts such as DCC tools usually work in metres, Z-up, radians.
//! These helpers are pure; the codecs never call them.
//!
//! ```text
//! XFBIN (x, y, z)  ->  host (x, z, -y)
//! host  (x, y, z)  ->  XFBIN (x, -z, y)
//! ```

/// Centimetres per metre
pub const CM_PER_M: f32 = 100.0;

/// Centimetres to metres
pub fn pos_cm_to_m(pos: [f32; 3]) -> [f32; 3] {
	pos.map(|v| v * 0.01)
}

/// Metres to centimetres
pub fn pos_m_to_cm(pos: [f32; 3]) -> [f32; 3] {
	pos.map(|v| v * CM_PER_M)
}

/// Y-up to Z-up axis swap
pub fn pos_to_host(pos: [f32; 3]) -> [f32; 3] {
	let [x, y, z] = pos;
	[x, z, -y]
}

/// Z-up to Y-up axis swap, the inverse of [`pos_to_host`]
pub fn pos_from_host(pos: [f32; 3]) -> [f32; 3] {
	let [x, y, z] = pos;
	[x, -z, y]
}

/// Axis swap plus centimetre to metre scaling
pub fn pos_scaled_to_host(pos: [f32; 3]) -> [f32; 3] {
	pos_to_host(pos_cm_to_m(pos))
}

/// Inverse of [`pos_scaled_to_host`]
pub fn pos_scaled_from_host(pos: [f32; 3]) -> [f32; 3] {
	pos_m_to_cm(pos_from_host(pos))
}

/// Degrees to negated radians, per axis
pub fn rot_to_host(rot: [f32; 3]) -> [f32; 3] {
	rot.map(|v| -v.to_radians())
}

/// Radians to negated degrees, per axis
pub fn rot_from_host(rot: [f32; 3]) -> [f32; 3] {
	rot.map(|v| -v.to_degrees())
}

/// Flips the V texture coordinate
pub fn uv_to_host(uv: [f32; 2]) -> [f32; 2] {
	[uv[0], 1.0 - uv[1]]
}

/// Flips the V texture coordinate back
pub fn uv_from_host(uv: [f32; 2]) -> [f32; 2] {
	uv_to_host(uv)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: [f32; 3], b: [f32; 3]) -> bool {
		a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
	}

	#[test]
	fn test_axis_swap() {
		assert_eq!(pos_to_host([1.0, 2.0, 3.0]), [1.0, 3.0, -2.0]);
		assert_eq!(pos_from_host([1.0, 3.0, -2.0]), [1.0, 2.0, 3.0]);
	}

	#[test]
	fn test_scaled_round_trip() {
		let pos = [12.5, -40.0, 7.25];
		let host = pos_scaled_to_host(pos);
		assert!(close(host, [0.125, 0.0725, 0.4]));
		assert!(close(pos_scaled_from_host(host), pos));
	}

	#[test]
	fn test_rotation() {
		let host = rot_to_host([90.0, 0.0, -180.0]);
		assert!(close(host, [-std::f32::consts::FRAC_PI_2, 0.0, std::f32::consts::PI]));
		assert!(close(rot_from_host(host), [90.0, 0.0, -180.0]));
	}

	#[test]
	fn test_uv_flip() {
		assert_eq!(uv_to_host([0.25, 0.25]), [0.25, 0.75]);
		assert_eq!(uv_from_host(uv_to_host([0.5, 0.0])), [0.5, 0.0]);
	}
}
