//! COLMAP camera intrinsics

use crate::DataError;

/// Camera models known to COLMAP, in the order of their numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraModel {
    SimplePinhole,
    Pinhole,
    SimpleRadial,
    Radial,
    OpenCv,
    OpenCvFisheye,
    FullOpenCv,
    Fov,
    SimpleRadialFisheye,
    RadialFisheye,
    ThinPrismFisheye,
}

impl CameraModel {
    pub fn from_id(id: i32) -> Result<Self, DataError> {
        Ok(match id {
            0 => Self::SimplePinhole,
            1 => Self::Pinhole,
            2 => Self::SimpleRadial,
            3 => Self::Radial,
            4 => Self::OpenCv,
            5 => Self::OpenCvFisheye,
            6 => Self::FullOpenCv,
            7 => Self::Fov,
            8 => Self::SimpleRadialFisheye,
            9 => Self::RadialFisheye,
            10 => Self::ThinPrismFisheye,
            _ => return Err(DataError::UnknownCameraModel(id.to_string())),
        })
    }

    pub fn from_name(name: &str) -> Result<Self, DataError> {
        Ok(match name {
            "SIMPLE_PINHOLE" => Self::SimplePinhole,
            "PINHOLE" => Self::Pinhole,
            "SIMPLE_RADIAL" => Self::SimpleRadial,
            "RADIAL" => Self::Radial,
            "OPENCV" => Self::OpenCv,
            "OPENCV_FISHEYE" => Self::OpenCvFisheye,
            "FULL_OPENCV" => Self::FullOpenCv,
            "FOV" => Self::Fov,
            "SIMPLE_RADIAL_FISHEYE" => Self::SimpleRadialFisheye,
            "RADIAL_FISHEYE" => Self::RadialFisheye,
            "THIN_PRISM_FISHEYE" => Self::ThinPrismFisheye,
            _ => return Err(DataError::UnknownCameraModel(name.to_string())),
        })
    }

    /// Number of parameters stored for this model.
    pub fn num_params(&self) -> usize {
        match self {
            Self::SimplePinhole => 3,
            Self::Pinhole => 4,
            Self::SimpleRadial => 4,
            Self::Radial => 5,
            Self::OpenCv => 8,
            Self::OpenCvFisheye => 8,
            Self::FullOpenCv => 12,
            Self::Fov => 5,
            Self::SimpleRadialFisheye => 4,
            Self::RadialFisheye => 5,
            Self::ThinPrismFisheye => 12,
        }
    }
}

/// Intrinsics of one physical camera.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapCamera {
    pub id: u32,
    pub model: CameraModel,
    pub width: u64,
    pub height: u64,
    pub params: Vec<f64>,
}

impl ColmapCamera {
    /// Focal lengths `(fx, fy)` of an undistorted pinhole camera.
    ///
    /// Any other model is rejected, since the rasterizer assumes an ideal
    /// pinhole projection.
    pub fn pinhole_focal(&self) -> Result<(f64, f64), DataError> {
        match self.model {
            CameraModel::SimplePinhole => Ok((self.params[0], self.params[0])),
            CameraModel::Pinhole => Ok((self.params[0], self.params[1])),
            model => Err(DataError::UnsupportedCameraModel(model)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_and_names_agree() {
        let names = [
            "SIMPLE_PINHOLE",
            "PINHOLE",
            "SIMPLE_RADIAL",
            "RADIAL",
            "OPENCV",
            "OPENCV_FISHEYE",
            "FULL_OPENCV",
            "FOV",
            "SIMPLE_RADIAL_FISHEYE",
            "RADIAL_FISHEYE",
            "THIN_PRISM_FISHEYE",
        ];
        for (id, name) in names.iter().enumerate() {
            assert_eq!(
                CameraModel::from_id(id as i32).unwrap(),
                CameraModel::from_name(name).unwrap()
            );
        }
        assert!(CameraModel::from_id(11).is_err());
        assert!(CameraModel::from_name("EQUIRECT").is_err());
    }

    #[test]
    fn test_pinhole_focal() {
        let simple = ColmapCamera {
            id: 1,
            model: CameraModel::SimplePinhole,
            width: 100,
            height: 50,
            params: vec![80.0, 50.0, 25.0],
        };
        assert_eq!(simple.pinhole_focal().unwrap(), (80.0, 80.0));

        let radial = ColmapCamera {
            model: CameraModel::SimpleRadial,
            params: vec![80.0, 50.0, 25.0, 0.01],
            ..simple
        };
        assert!(matches!(
            radial.pinhole_focal(),
            Err(DataError::UnsupportedCameraModel(CameraModel::SimpleRadial))
        ));
    }
}
