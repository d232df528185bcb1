pub mod general;

#[cfg(test)]
mod general_tests {
    use crate::general::{format_laptime, format_millis, max, mean, std_dev};
    use approx::assert_ulps_eq;

    #[test]
    fn test_max_1() {
        let x: Vec<u32> = vec![3, 1, 5, 8, 2];
        assert_eq!(max(&x), Some(8));
    }
    #[test]
    fn test_max_2() {
        let x: Vec<f64> = vec![3.0, -1.0, 5.0, 8.0, -2.0];
        assert_ulps_eq!(max(&x).unwrap(), 8.0);
    }
    #[test]
    fn test_max_3() {
        let x: Vec<u32> = vec![];
        assert!(max(&x).is_none());
    }

    #[test]
    fn test_mean_1() {
        let x: Vec<u32> = vec![90_000, 92_000, 94_000];
        assert_ulps_eq!(mean(&x).unwrap(), 92_000.0);
    }
    #[test]
    fn test_mean_2() {
        let x: Vec<u32> = vec![];
        assert!(mean(&x).is_none());
    }

    #[test]
    fn test_std_dev_1() {
        let x: Vec<u32> = vec![2, 4, 4, 4, 5, 5, 7, 9];
        assert_ulps_eq!(std_dev(&x).unwrap(), 2.0);
    }
    #[test]
    fn test_std_dev_2() {
        let x: Vec<u32> = vec![91_000];
        assert!(std_dev(&x).is_none());
    }
    #[test]
    fn test_std_dev_3() {
        let x: Vec<u32> = vec![91_000, 91_000, 91_000];
        assert_ulps_eq!(std_dev(&x).unwrap(), 0.0);
    }

    #[test]
    fn test_format_millis_1() {
        assert_eq!(format_millis(25_300), "25.300");
    }
    #[test]
    fn test_format_millis_2() {
        assert_eq!(format_millis(5), "0.005");
    }
    #[test]
    fn test_format_millis_3() {
        assert_eq!(format_millis(125_040), "125.040");
    }

    #[test]
    fn test_format_laptime_1() {
        assert_eq!(format_laptime(83_456), "1:23.456");
    }
    #[test]
    fn test_format_laptime_2() {
        assert_eq!(format_laptime(59_999), "59.999");
    }
    #[test]
    fn test_format_laptime_3() {
        assert_eq!(format_laptime(600_005), "10:00.005");
    }
}
