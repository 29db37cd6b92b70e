//! Canonical region names and the alias table used to normalize them

use std::collections::HashMap;
use std::sync::LazyLock;

/// Closed list of regions the extraction model may return
pub const CANONICAL_LOCATIONS: &[&str] = &[
    "Hà Nội",
    "TP Hồ Chí Minh",
    "Hải Phòng",
    "Đà Nẵng",
    "Cần Thơ",
    "An Giang",
    "Bà Rịa - Vũng Tàu",
    "Bắc Giang",
    "Bắc Kạn",
    "Bạc Liêu",
    "Bắc Ninh",
    "Bến Tre",
    "Bình Định",
    "Bình Dương",
    "Bình Phước",
    "Bình Thuận",
    "Cà Mau",
    "Cao Bằng",
    "Đắk Lắk",
    "Đắk Nông",
    "Điện Biên",
    "Đồng Nai",
    "Đồng Tháp",
    "Gia Lai",
    "Hà Giang",
    "Hà Nam",
    "Hà Tĩnh",
    "Hải Dương",
    "Hậu Giang",
    "Hòa Bình",
    "Hưng Yên",
    "Khánh Hòa",
    "Kiên Giang",
    "Kon Tum",
    "Lai Châu",
    "Lâm Đồng",
    "Lạng Sơn",
    "Lào Cai",
    "Long An",
    "Nam Định",
    "Nghệ An",
    "Ninh Bình",
    "Ninh Thuận",
    "Phú Thọ",
    "Phú Yên",
    "Quảng Bình",
    "Quảng Nam",
    "Quảng Ngãi",
    "Quảng Ninh",
    "Quảng Trị",
    "Sóc Trăng",
    "Sơn La",
    "Tây Ninh",
    "Thái Bình",
    "Thái Nguyên",
    "Thanh Hóa",
    "Thừa Thiên Huế",
    "Tiền Giang",
    "Trà Vinh",
    "Tuyên Quang",
    "Vĩnh Long",
    "Vĩnh Phúc",
    "Yên Bái",
];

const ALIASES: &[(&str, &str)] = &[
    ("hà nội", "Hà Nội"),
    ("hn", "Hà Nội"),
    ("ha noi", "Hà Nội"),
    ("tp hồ chí minh", "TP Hồ Chí Minh"),
    ("tp hcm", "TP Hồ Chí Minh"),
    ("hcm", "TP Hồ Chí Minh"),
    ("sài gòn", "TP Hồ Chí Minh"),
    ("sai gon", "TP Hồ Chí Minh"),
    ("ho chi minh", "TP Hồ Chí Minh"),
    ("hải phòng", "Hải Phòng"),
    ("hp", "Hải Phòng"),
    ("hai phong", "Hải Phòng"),
    ("đà nẵng", "Đà Nẵng"),
    ("da nang", "Đà Nẵng"),
    ("dn", "Đà Nẵng"),
    ("cần thơ", "Cần Thơ"),
    ("can tho", "Cần Thơ"),
    ("an giang", "An Giang"),
    ("bà rịa - vũng tàu", "Bà Rịa - Vũng Tàu"),
    ("bà rịa vũng tàu", "Bà Rịa - Vũng Tàu"),
    ("ba ria vung tau", "Bà Rịa - Vũng Tàu"),
    ("bắc giang", "Bắc Giang"),
    ("bac giang", "Bắc Giang"),
    ("bắc kạn", "Bắc Kạn"),
    ("bac kan", "Bắc Kạn"),
    ("bạc liêu", "Bạc Liêu"),
    ("bac lieu", "Bạc Liêu"),
    ("bắc ninh", "Bắc Ninh"),
    ("bac ninh", "Bắc Ninh"),
    ("bến tre", "Bến Tre"),
    ("ben tre", "Bến Tre"),
    ("bình định", "Bình Định"),
    ("binh dinh", "Bình Định"),
    ("bình dương", "Bình Dương"),
    ("binh duong", "Bình Dương"),
    ("bình phước", "Bình Phước"),
    ("binh phuoc", "Bình Phước"),
    ("bình thuận", "Bình Thuận"),
    ("binh thuan", "Bình Thuận"),
    ("cà mau", "Cà Mau"),
    ("ca mau", "Cà Mau"),
    ("cao bằng", "Cao Bằng"),
    ("cao bang", "Cao Bằng"),
    ("đắk lắk", "Đắk Lắk"),
    ("dak lak", "Đắk Lắk"),
    ("đắk nông", "Đắk Nông"),
    ("dak nong", "Đắk Nông"),
    ("điện biên", "Điện Biên"),
    ("dien bien", "Điện Biên"),
    ("đồng nai", "Đồng Nai"),
    ("dong nai", "Đồng Nai"),
    ("đồng tháp", "Đồng Tháp"),
    ("dong thap", "Đồng Tháp"),
    ("gia lai", "Gia Lai"),
    ("hà giang", "Hà Giang"),
    ("ha giang", "Hà Giang"),
    ("hà nam", "Hà Nam"),
    ("ha nam", "Hà Nam"),
    ("hà tĩnh", "Hà Tĩnh"),
    ("ha tinh", "Hà Tĩnh"),
    ("hải dương", "Hải Dương"),
    ("hai duong", "Hải Dương"),
    ("hậu giang", "Hậu Giang"),
    ("hau giang", "Hậu Giang"),
    ("hòa bình", "Hòa Bình"),
    ("hoa binh", "Hòa Bình"),
    ("hưng yên", "Hưng Yên"),
    ("hung yen", "Hưng Yên"),
    ("khánh hòa", "Khánh Hòa"),
    ("khanh hoa", "Khánh Hòa"),
    ("kiên giang", "Kiên Giang"),
    ("kien giang", "Kiên Giang"),
    ("kon tum", "Kon Tum"),
    ("lai châu", "Lai Châu"),
    ("lai chau", "Lai Châu"),
    ("lâm đồng", "Lâm Đồng"),
    ("lam dong", "Lâm Đồng"),
    ("lạng sơn", "Lạng Sơn"),
    ("lang son", "Lạng Sơn"),
    ("lào cai", "Lào Cai"),
    ("lao cai", "Lào Cai"),
    ("long an", "Long An"),
    ("nam định", "Nam Định"),
    ("nam dinh", "Nam Định"),
    ("nghệ an", "Nghệ An"),
    ("nghe an", "Nghệ An"),
    ("ninh bình", "Ninh Bình"),
    ("ninh binh", "Ninh Bình"),
    ("ninh thuận", "Ninh Thuận"),
    ("ninh thuan", "Ninh Thuận"),
    ("phú thọ", "Phú Thọ"),
    ("phu tho", "Phú Thọ"),
    ("phú yên", "Phú Yên"),
    ("phu yen", "Phú Yên"),
    ("quảng bình", "Quảng Bình"),
    ("quang binh", "Quảng Bình"),
    ("quảng nam", "Quảng Nam"),
    ("quang nam", "Quảng Nam"),
    ("quảng ngãi", "Quảng Ngãi"),
    ("quang ngai", "Quảng Ngãi"),
    ("quảng ninh", "Quảng Ninh"),
    ("quang ninh", "Quảng Ninh"),
    ("quảng trị", "Quảng Trị"),
    ("quang tri", "Quảng Trị"),
    ("sóc trăng", "Sóc Trăng"),
    ("soc trang", "Sóc Trăng"),
    ("sơn la", "Sơn La"),
    ("son la", "Sơn La"),
    ("tây ninh", "Tây Ninh"),
    ("tay ninh", "Tây Ninh"),
    ("thái bình", "Thái Bình"),
    ("thai binh", "Thái Bình"),
    ("thái nguyên", "Thái Nguyên"),
    ("thai nguyen", "Thái Nguyên"),
    ("thanh hóa", "Thanh Hóa"),
    ("thanh hoa", "Thanh Hóa"),
    ("thừa thiên huế", "Thừa Thiên Huế"),
    ("thua thien hue", "Thừa Thiên Huế"),
    ("tiền giang", "Tiền Giang"),
    ("tien giang", "Tiền Giang"),
    ("trà vinh", "Trà Vinh"),
    ("tra vinh", "Trà Vinh"),
    ("tuyên quang", "Tuyên Quang"),
    ("tuyen quang", "Tuyên Quang"),
    ("vĩnh long", "Vĩnh Long"),
    ("vinh long", "Vĩnh Long"),
    ("vĩnh phúc", "Vĩnh Phúc"),
    ("vinh phuc", "Vĩnh Phúc"),
    ("yên bái", "Yên Bái"),
    ("yen bai", "Yên Bái"),
];

static ALIAS_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

/// Map a free-form spelling to its canonical region name
///
/// Lookup is exact after lowercasing and trimming; anything not in the table
/// is rejected.
pub fn normalize_location(raw: &str) -> Option<&'static str> {
    let key = raw.trim().to_lowercase();
    ALIAS_TABLE.get(key.as_str()).copied()
}
