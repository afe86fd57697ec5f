#![allow(dead_code)]

use cidmetrics::{assemble, CompiledFont, MemoryResolver};

pub const UNI2CID_FILE: &str = "uni2cid_aj16.php";

pub const METRICS: &str = "<?php
// TCPDF FONT FILE DESCRIPTION
$type='cidfont0';
$name='ArialUnicodeMS';
$up=-130;
$ut=40;
$dw=1000;
$diff='';
$originalsize=0;
$enc='UniJIS-UTF16-H';
$cidinfo=array('Registry'=>'Adobe','Ordering'=>'Japan1','Supplement'=>5);
include(dirname(__FILE__).'/uni2cid_aj16.php');
$cw=array(0=>0,32=>278,33=>278,34=>355,48=>556,49=>556,50=>556,65=>667,200=>600,12354=>1000,12356=>920,20000=>500,30000=>700);
$desc=array('Ascent'=>857,'Descent'=>-143,'CapHeight'=>857,'Flags'=>32,'FontBBox'=>'[-177 -269 1123 866]','ItalicAngle'=>0,'StemV'=>70,'MissingWidth'=>500);
?>
";

pub const UNI2CID: &str = "<?php
// unicode to CID map
$cidinfo['uni2cid']=array(32=>1,33=>2,34=>3,48=>17,49=>18,50=>19,65=>34,12354=>843,12356=>845,20000=>1200,20001=>1200);
?>
";

/// Expected `(start, end, width)` ranges for [`METRICS`].
pub const EXPECTED_RANGES: &[(u32, u32, i32)] = &[
    (1, 2, 278),
    (3, 3, 355),
    (17, 19, 556),
    (34, 34, 667),
    (200, 200, 600),
    (845, 845, 920),
    (1200, 1200, 500),
];

pub fn resolver() -> MemoryResolver {
    MemoryResolver::new().with_file(UNI2CID_FILE, UNI2CID)
}

pub fn compile(metrics: &str) -> cidmetrics::Result<CompiledFont> {
    assemble(metrics.as_bytes(), resolver())
}

pub fn triples(font: &CompiledFont) -> Vec<(u32, u32, i32)> {
    font.widths
        .ranges()
        .iter()
        .map(|r| (r.start, r.end, r.width))
        .collect()
}
