use cutin_archive::{glh, pack, read_directory, unpack};
use proptest::prelude::*;

#[test]
fn test_directory_roundtrip() {
    let images = vec![
        b"DDS |first image with some repeated repeated repeated bytes".to_vec(),
        Vec::new(),
        vec![0xFF; 700],
        (0..=255u8).cycle().take(2000).collect(),
    ];

    let file = pack(&images).unwrap();
    let items = unpack(&file).unwrap();

    assert_eq!(items.len(), images.len());
    for (index, (item, image)) in items.iter().zip(&images).enumerate() {
        assert_eq!(item.id, index as i32);
        assert_eq!(&item.data, image);
    }
}

#[test]
fn test_raw_items_are_glh_envelopes() {
    let file = pack(&[b"alpha".as_slice(), b"beta".as_slice()]).unwrap();
    let raw = read_directory(&file).unwrap();

    assert_eq!(raw.len(), 2);
    for item in &raw {
        assert!(glh::is_glh(item.data));
        let header = glh::GlhHeader::parse(item.data).unwrap();
        assert_eq!(header.wrapped_size.get() as usize, item.data.len());
    }
}

proptest! {
    #[test]
    fn prop_wrap_roundtrip(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        prop_assert_eq!(glh::unwrap(&glh::wrap(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn prop_directory_roundtrip(
        images in prop::collection::vec(prop::collection::vec(0u8..8, 0..512), 0..6)
    ) {
        let file = pack(&images).unwrap();
        let items = unpack(&file).unwrap();

        prop_assert_eq!(items.len(), images.len());
        for (index, item) in items.iter().enumerate() {
            prop_assert_eq!(item.id, index as i32);
            prop_assert_eq!(&item.data, &images[index]);
        }
    }

    #[test]
    fn prop_short_tail_is_ignored(
        images in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..4),
        tail in prop::collection::vec(any::<u8>(), 0..8),
    ) {
        let mut file = pack(&images).unwrap();
        file[..4].copy_from_slice(&100i32.to_be_bytes());
        file.extend_from_slice(&tail);

        prop_assert_eq!(unpack(&file).unwrap().len(), images.len());
    }
}
